pub mod chunker;
#[cfg(feature = "audio-io")]
pub mod input;
pub mod wav;

pub use chunker::ChunkAccumulator;
#[cfg(feature = "audio-io")]
pub use input::{is_capture_supported, AudioInput};
pub use wav::{read_wav, write_wav};

use crate::Result;
use tracing::info;

/// Offline check of the capture-to-WAV pipeline (no device required).
pub fn test_audio_pipeline() -> Result<()> {
    info!("Testing audio pipeline...");

    // Test 1: Chunk framing
    info!("Testing chunk framing...");
    let mut chunker = ChunkAccumulator::new(2048);
    let data: Vec<f32> = (0..5000).map(|i| i as f32 / 5000.0).collect();
    let chunks = chunker.push(&data);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunker.pending(), 5000 - 2 * 2048);
    info!("✓ Chunk framing test passed!");

    // Test 2: Incremental WAV encoding
    info!("Testing incremental WAV encoding...");
    let sample_rate = 16000;
    let tone: Vec<f32> = (0..sample_rate as usize)
        .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / sample_rate as f32).sin() * 0.5)
        .collect();

    let mut take = crate::encoder::TakeBuffer::new();
    take.encode(&tone);
    let first = take.dump(sample_rate);
    assert_eq!(first.len(), wav::HEADER_LEN + tone.len() * wav::BYTES_PER_SAMPLE);

    take.encode(&tone);
    let second = take.dump(sample_rate);
    assert_eq!(
        second.len(),
        wav::HEADER_LEN + 2 * tone.len() * wav::BYTES_PER_SAMPLE
    );
    assert!((wav::duration_seconds(&second).unwrap_or(0.0) - 2.0).abs() < 1e-9);
    info!("✓ Incremental WAV encoding test passed!");

    // Test 3: WAV file handling
    info!("Testing WAV file handling...");
    let wav_path = std::env::temp_dir().join("retake_pipeline_test.wav");
    write_wav(&wav_path, &tone, sample_rate)?;
    let (read_samples, read_rate) = read_wav(&wav_path)?;
    assert_eq!(read_rate, sample_rate);
    assert_eq!(read_samples.len(), tone.len());
    std::fs::remove_file(&wav_path).ok();
    info!("✓ WAV file handling test passed!");

    info!("✅ All audio pipeline tests passed!");
    Ok(())
}
