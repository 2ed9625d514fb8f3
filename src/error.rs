//! Error types for workout-file encoding.
//!
//! Values that cannot be represented in the format are rejected up front;
//! over-length text is the one documented exception and is truncated
//! instead. I/O failures from file sinks pass through unmodified.

use thiserror::Error;

use crate::models::Sport;

/// Highest step count a workout file can hold: step indices and the valid
/// step counter are both 16-bit fields.
pub const MAX_STEPS: usize = u16::MAX as usize;

/// Errors produced while encoding a workout file.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Sport with no workout-file mapping
    #[error("no workout file mapping for sport {sport:?}")]
    UnsupportedSport { sport: Sport },

    /// Flattened step count exceeds the 16-bit step index space
    #[error("workout flattens to {count} steps, limit is {max}")]
    TooManySteps { count: usize, max: usize },

    /// A mapped value does not fit its 32-bit protocol field
    #[error("{field} value {value} does not fit the protocol field")]
    ValueOutOfRange { field: &'static str, value: u64 },

    /// IO errors from the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EncodeError>;
