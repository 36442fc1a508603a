//! Error types for the emission crate.

use alsvid_code::QubitId;
use thiserror::Error;

/// Errors that can occur while emitting a program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QesError {
    /// A detection event or observable referenced a qubit that has no
    /// recorded measurement outcome.
    #[error("no measurement outcome recorded for {qubit}")]
    MissingMeasurement {
        /// The unmeasured qubit.
        qubit: QubitId,
    },

    /// A memory experiment needs at least one round.
    #[error("memory experiment requires at least one round")]
    ZeroRounds,
}

/// Result type for emission operations.
pub type QesResult<T> = Result<T, QesError>;
