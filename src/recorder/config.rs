use crate::audio::wav;

/// A previously recorded take to resume from.
#[derive(Clone, Debug, Default)]
pub struct ResumedTake {
    /// Complete WAV buffer from an earlier dump
    pub wav: Vec<u8>,

    /// Cumulative recorded time of that buffer, in seconds
    pub current_time: f64,
}

impl ResumedTake {
    pub fn new(wav: Vec<u8>, current_time: f64) -> Self {
        Self { wav, current_time }
    }

    /// Build a resume seed deriving the time from the buffer's own header.
    pub fn from_wav(wav: Vec<u8>) -> Self {
        let current_time = wav::duration_seconds(&wav).unwrap_or(0.0);
        Self { wav, current_time }
    }
}

/// Configuration for the recorder controller
#[derive(Clone, Debug)]
pub struct RecorderConfig {
    /// Samples per chunk forwarded to the encoder
    pub chunk_samples: usize,

    /// Capacity of the encoder's dump result channel
    pub event_capacity: usize,

    /// Optional take to resume instead of starting empty
    pub resume: Option<ResumedTake>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            chunk_samples: 2048,
            event_capacity: 8,
            resume: None,
        }
    }
}

impl RecorderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size in samples
    pub fn with_chunk_samples(mut self, chunk_samples: usize) -> Self {
        self.chunk_samples = chunk_samples;
        self
    }

    /// Set the dump result channel capacity
    pub fn with_event_capacity(mut self, event_capacity: usize) -> Self {
        self.event_capacity = event_capacity;
        self
    }

    /// Set the take to resume from
    pub fn with_resume(mut self, resume: ResumedTake) -> Self {
        self.resume = Some(resume);
        self
    }
}
