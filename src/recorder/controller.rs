//! Recorder controller owning the capture lifecycle.
//!
//! The controller runs on the caller's thread and coordinates two others:
//! the capture callback (audio host thread) frames samples into fixed-size
//! chunks, advances the session clock, and streams the chunks to the encoder
//! worker; an event pump forwards finished WAV buffers back to subscribers.
//! All communication crosses channels; the only shared data is the small
//! session snapshot behind a lock.

use crate::audio::chunker::ChunkAccumulator;
use crate::audio::input::AudioInput;
use crate::encoder::{EncoderCommand, EncoderEvent, WavEncoder};
use crate::recorder::{EventBus, RecorderConfig, RecorderEvent, RecorderState, SubscriptionId};
use crate::Result;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Session data shared with the capture callback.
struct Session {
    state: RecorderState,
    current_time: f64,
}

/// Time contributed by one chunk at the given device rate.
fn chunk_duration(samples: usize, sample_rate: u32) -> f64 {
    samples as f64 / sample_rate as f64
}

/// Microphone recorder with pause/resume and incremental WAV dumps.
///
/// State transitions are total: unsupported transitions are no-ops. The
/// capture device is acquired at most once per session (first `start()`)
/// and reused across pause/resume; `stop()` releases it.
pub struct Recorder {
    session: Arc<Mutex<Session>>,
    bus: EventBus,
    input: AudioInput,
    encoder: WavEncoder,
    audio_requested: Arc<AtomicBool>,
    sample_rate: u32,
    chunk_samples: usize,
    worker_handle: Option<JoinHandle<()>>,
    pump_handle: Option<JoinHandle<()>>,
}

impl Recorder {
    /// Create a recorder bound to the default capture device.
    ///
    /// Fails if no device is available or its config cannot be read; the
    /// caller surfaces that to the user. A configured resume seed is
    /// forwarded to the encoder and restores the session clock.
    pub fn new(config: RecorderConfig) -> Result<Self> {
        let input = AudioInput::new()?;
        let sample_rate = input.sample_rate();

        let (encoder, worker) = WavEncoder::new(config.event_capacity);
        let worker_handle = worker.start();

        let mut current_time = 0.0;
        if let Some(resume) = config.resume {
            current_time = resume.current_time;
            encoder.set_recorded_buffer(resume.wav)?;
        }

        let session = Arc::new(Mutex::new(Session {
            state: RecorderState::Inactive,
            current_time,
        }));
        let bus = EventBus::new();
        let audio_requested = Arc::new(AtomicBool::new(false));

        let pump_handle = {
            let bus = bus.clone();
            let audio_requested = Arc::clone(&audio_requested);
            let event_rx = encoder.event_receiver();
            thread::spawn(move || pump_events(event_rx, bus, audio_requested))
        };

        info!(sample_rate, "Recorder initialized");

        Ok(Self {
            session,
            bus,
            input,
            encoder,
            audio_requested,
            sample_rate,
            chunk_samples: config.chunk_samples,
            worker_handle: Some(worker_handle),
            pump_handle: Some(pump_handle),
        })
    }

    /// Start or resume recording.
    ///
    /// No-op while already recording. Resuming from pause reuses the open
    /// capture stream. On device failure the state is unchanged.
    pub fn start(&mut self) -> Result<()> {
        match self.state() {
            RecorderState::Recording => return Ok(()),
            RecorderState::Paused => {
                self.set_state(RecorderState::Recording);
                return Ok(());
            }
            RecorderState::Inactive => {}
        }

        let session = Arc::clone(&self.session);
        let bus = self.bus.clone();
        let encode_tx = self.encoder.command_sender();
        let sample_rate = self.sample_rate;
        let mut chunker = ChunkAccumulator::new(self.chunk_samples);

        self.input.open(move |data| {
            let mut session = session.lock();
            // Chunks arriving while paused are discarded, not buffered
            if !session.state.is_recording() {
                return;
            }

            for chunk in chunker.push(data) {
                session.current_time += chunk_duration(chunk.len(), sample_rate);
                bus.emit(RecorderEvent::TimeChanged(session.current_time));
                if encode_tx.send(EncoderCommand::Encode(chunk)).is_err() {
                    warn!("Encoder channel disconnected, dropping capture chunk");
                }
            }
        })?;

        self.set_state(RecorderState::Recording);
        Ok(())
    }

    /// Pause recording; no-op unless currently recording.
    pub fn pause(&mut self) {
        if !self.state().is_recording() {
            return;
        }
        self.set_state(RecorderState::Paused);
    }

    /// Stop recording and release the capture device.
    ///
    /// Safe from any state; no-op when inactive.
    pub fn stop(&mut self) {
        if self.state().is_inactive() {
            return;
        }
        self.set_state(RecorderState::Inactive);
        self.input.close();
    }

    /// Start when not recording, pause otherwise.
    pub fn toggle(&mut self) -> Result<()> {
        if self.state().is_recording() {
            self.pause();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Request the accumulated take as a WAV buffer.
    ///
    /// The buffer arrives asynchronously as an `AudioReady` event. Requests
    /// while a dump is in flight are dropped silently.
    pub fn request_audio(&self) {
        if self.audio_requested.swap(true, Ordering::SeqCst) {
            debug!("Audio dump already in flight");
            return;
        }

        if self.encoder.dump(self.sample_rate).is_err() {
            self.audio_requested.store(false, Ordering::SeqCst);
            warn!("Encoder channel disconnected, audio request dropped");
        }
    }

    /// Discard all accumulated audio and reset the session clock.
    ///
    /// Safe from any state.
    pub fn clear_audio_data(&self) {
        if self.encoder.clear().is_err() {
            warn!("Encoder channel disconnected");
        }

        self.session.lock().current_time = 0.0;
        self.bus.emit(RecorderEvent::TimeChanged(0.0));
    }

    /// Register an event subscriber.
    pub fn subscribe(&self) -> (SubscriptionId, Receiver<RecorderEvent>) {
        self.bus.subscribe()
    }

    /// Remove an event subscriber; no events are delivered after removal.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RecorderState {
        self.session.lock().state
    }

    /// Cumulative recorded time in seconds.
    pub fn current_time(&self) -> f64 {
        self.session.lock().current_time
    }

    /// Sample rate of the capture device.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of times the capture stream has been acquired.
    pub fn acquisitions(&self) -> u32 {
        self.input.acquisitions()
    }

    fn set_state(&self, state: RecorderState) {
        self.session.lock().state = state;
        debug!(%state, "Recorder state changed");
        self.bus.emit(RecorderEvent::StateChanged(state));
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.stop();
        let _ = self.encoder.shutdown();
        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.pump_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Forward encoder events to subscribers and release the dump-in-flight flag.
fn pump_events(
    event_rx: Receiver<EncoderEvent>,
    bus: EventBus,
    audio_requested: Arc<AtomicBool>,
) {
    loop {
        match event_rx.recv() {
            Ok(EncoderEvent::Audio(wav)) => {
                audio_requested.store(false, Ordering::SeqCst);
                bus.emit(RecorderEvent::AudioReady(wav));
            }
            Ok(EncoderEvent::Shutdown) | Err(_) => break,
        }
    }
    debug!("Encoder event pump stopped");
}
