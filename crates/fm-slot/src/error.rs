//! Error types for the spin engine

use thiserror::Error;

/// Spin engine errors
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Secure random source failed: {0}")]
    Entropy(String),

    #[error("Strip length must be positive")]
    InvalidStripLength,

    #[error("Bet must be positive")]
    InvalidBet,

    #[error("Bet {bet} overflows payout arithmetic")]
    BetTooLarge { bet: u64 },

    #[error("Too many stop combinations: {combinations} > {limit}")]
    TooManyCombinations { combinations: u128, limit: u128 },
}

/// Result type for spin engine operations
pub type SlotResult<T> = Result<T, SlotError>;
