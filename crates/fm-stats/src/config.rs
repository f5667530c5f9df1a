//! Simulation tuning

use serde::{Deserialize, Serialize};

/// Spins per batch between progress reports
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Progress events buffered before the worker waits on the host
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Simulation tuning. None of these change the expected result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Spins per batch; cancellation latency is one batch
    pub batch_size: usize,
    /// Bounded event channel size
    pub event_capacity: usize,
    /// Split each batch over the rayon pool
    pub parallel: bool,
    /// Work units per parallel batch
    pub chunks: usize,
    /// Reproducible ChaCha8 streams instead of OS entropy. Debugging only.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            parallel: true,
            chunks: num_cpus::get(),
            seed: None,
        }
    }
}

impl SimConfig {
    /// Single-threaded configuration
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            chunks: 1,
            ..Default::default()
        }
    }

    /// Set a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Effective batch size, never zero
    pub(crate) fn batch_len(&self) -> u64 {
        self.batch_size.max(1) as u64
    }

    /// Effective chunk count, never zero
    pub(crate) fn chunk_count(&self) -> u64 {
        if self.parallel {
            self.chunks.max(1) as u64
        } else {
            1
        }
    }
}
