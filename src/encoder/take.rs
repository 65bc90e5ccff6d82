use crate::audio::wav::{self, HEADER_LEN};

/// Accumulated audio for one recording take.
///
/// Holds the previously dumped WAV buffer plus the PCM chunks encoded since,
/// and serializes both into a single buffer on demand. Each dump becomes the
/// new prior buffer, so a take grows losslessly across any number of dumps,
/// including takes seeded from a buffer recorded in an earlier session.
pub struct TakeBuffer {
    /// Last dumped WAV buffer (header + payload), or a 44-byte placeholder
    /// whose header region is rewritten on every dump.
    prior: Vec<u8>,
    /// Encoded PCM chunks awaiting the next dump, in arrival order.
    pending: Vec<Vec<u8>>,
}

impl TakeBuffer {
    pub fn new() -> Self {
        Self {
            prior: vec![0; HEADER_LEN],
            pending: Vec::new(),
        }
    }

    /// Encode a chunk of f32 samples to 16-bit PCM and queue it.
    ///
    /// Chunks are never reordered and never dropped once accepted.
    pub fn encode(&mut self, samples: &[f32]) {
        self.pending.push(wav::encode_pcm(samples));
    }

    /// Encoded bytes queued since the last dump.
    pub fn pending_bytes(&self) -> usize {
        self.pending.iter().map(Vec::len).sum()
    }

    /// Serialize everything accumulated so far into a complete WAV buffer.
    ///
    /// The result is `header ++ prior payload ++ pending chunks` and becomes
    /// the new prior buffer; the pending queue is cleared. With nothing
    /// accumulated this yields a header-only 44-byte buffer.
    pub fn dump(&mut self, sample_rate: u32) -> Vec<u8> {
        let payload_len = self.prior.len() - HEADER_LEN + self.pending_bytes();

        let mut out = wav::header(payload_len as u32, sample_rate);
        out.reserve(payload_len);
        out.extend_from_slice(&self.prior[HEADER_LEN..]);
        for chunk in self.pending.drain(..) {
            out.extend_from_slice(&chunk);
        }

        self.prior = out.clone();
        out
    }

    /// Discard pending chunks and prior audio.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.prior = vec![0; HEADER_LEN];
    }

    /// Seed the prior buffer from an existing WAV take.
    ///
    /// A buffer shorter than a header degrades to an empty seed.
    pub fn seed(&mut self, buffer: Vec<u8>) {
        self.prior = if buffer.len() >= HEADER_LEN {
            buffer
        } else {
            vec![0; HEADER_LEN]
        };
    }
}

impl Default for TakeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
