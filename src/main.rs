use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retake=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting retake capture demo");

    retake::audio::test_audio_pipeline()?;

    #[cfg(feature = "audio-io")]
    live_capture_demo()?;

    Ok(())
}

/// Record a short live take through the full controller surface and write
/// the dumped buffer to disk.
#[cfg(feature = "audio-io")]
fn live_capture_demo() -> Result<()> {
    use retake::recorder::{Recorder, RecorderConfig, RecorderEvent};
    use std::time::Duration;

    if !retake::audio::is_capture_supported() {
        info!("No capture device available, skipping live demo");
        return Ok(());
    }

    let mut recorder = Recorder::new(RecorderConfig::default())?;
    let (_subscription, events) = recorder.subscribe();

    info!(sample_rate = recorder.sample_rate(), "Recording 3 seconds");
    recorder.start()?;
    std::thread::sleep(Duration::from_secs(2));

    recorder.pause();
    info!(seconds = recorder.current_time(), "Paused, resuming");
    recorder.start()?;
    std::thread::sleep(Duration::from_secs(1));

    recorder.stop();
    info!(seconds = recorder.current_time(), "Capture finished");

    recorder.request_audio();
    while let Ok(event) = events.recv_timeout(Duration::from_secs(5)) {
        if let RecorderEvent::AudioReady(wav) = event {
            let path = std::env::temp_dir().join("retake_demo.wav");
            std::fs::write(&path, &wav)?;
            info!(bytes = wav.len(), "Wrote take to {:?}", path);
            break;
        }
    }

    Ok(())
}
