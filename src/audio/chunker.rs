/// Reframes host-sized capture slices into fixed-size chunks.
///
/// Capture backends deliver sample slices of whatever size the host picks;
/// downstream accounting and encoding work on bounded chunks of a fixed
/// sample count. Leftover samples are carried over to the next push.
pub struct ChunkAccumulator {
    chunk_samples: usize,
    staging: Vec<f32>,
}

impl ChunkAccumulator {
    /// Create an accumulator producing chunks of `chunk_samples` samples.
    pub fn new(chunk_samples: usize) -> Self {
        Self {
            chunk_samples,
            staging: Vec::with_capacity(chunk_samples * 2),
        }
    }

    /// Append samples and drain every complete chunk, in order.
    pub fn push(&mut self, samples: &[f32]) -> Vec<Vec<f32>> {
        self.staging.extend_from_slice(samples);

        let mut chunks = Vec::new();
        while self.staging.len() >= self.chunk_samples {
            chunks.push(self.staging.drain(..self.chunk_samples).collect());
        }

        chunks
    }

    /// Number of staged samples short of a complete chunk.
    pub fn pending(&self) -> usize {
        self.staging.len()
    }

    /// Discard staged samples.
    pub fn clear(&mut self) {
        self.staging.clear();
    }
}
