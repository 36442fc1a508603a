//! Error types for the code-model crate.

use crate::model::{CheckId, PlaquetteId, QubitId};
use thiserror::Error;

/// Errors that can occur while constructing or serializing a Tanner model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodeError {
    /// A check's support references a data qubit that was never declared.
    #[error("check support references unknown data qubit {qubit}")]
    UnknownDataQubit {
        /// The missing data qubit.
        qubit: QubitId,
    },

    /// A data-qubit label collides with the ancilla id range.
    #[error("data qubit label {qubit} collides with already-allocated ancilla ids")]
    LabelCollision {
        /// The offending label.
        qubit: QubitId,
    },

    /// A plaquette references a check that does not exist in the model.
    #[error("plaquette {plaquette:?} references unknown check {check:?}")]
    UnknownCheck {
        /// The plaquette being assembled.
        plaquette: PlaquetteId,
        /// The missing check.
        check: CheckId,
    },

    /// A check's schedule was written more than once.
    #[error("schedule for check {check:?} is already populated")]
    ScheduleAlreadySet {
        /// The check whose schedule was being overwritten.
        check: CheckId,
    },

    /// A schedule does not cover the check's support exactly once.
    #[error("schedule for check {check:?} does not match its support")]
    ScheduleMismatch {
        /// The check with the malformed schedule.
        check: CheckId,
    },

    /// A line in a Tanner-graph file could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Underlying I/O failure while reading or writing a Tanner-graph file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for code-model operations.
pub type CodeResult<T> = Result<T, CodeError>;
