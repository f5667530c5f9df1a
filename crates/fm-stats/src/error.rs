//! Error types for the statistics driver

use fm_slot::SlotError;
use thiserror::Error;

/// Statistics driver errors
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Spin failed: {0}")]
    Slot(#[from] SlotError),

    #[error("A simulation is already running")]
    AlreadyRunning,

    #[error("Iteration count must be positive, got {0}")]
    InvalidIterations(u64),

    #[error("Statistics worker disconnected")]
    WorkerDisconnected,

    #[error("Failed to spawn statistics worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Malformed protocol message: {0}")]
    Protocol(#[from] serde_json::Error),
}

/// Result type for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;
