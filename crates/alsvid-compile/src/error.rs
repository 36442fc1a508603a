//! Error types for the compilation crate.

use alsvid_code::{CheckId, CodeError, QubitId};
use thiserror::Error;

/// Errors that can occur while scheduling or flag-planning a code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// No feasible slot assignment exists for a check within the depth bound.
    #[error("no feasible schedule for check {check:?} over support {support:?}")]
    ScheduleInfeasible {
        /// The check whose solve failed.
        check: CheckId,
        /// Its non-gap support.
        support: Vec<QubitId>,
    },

    /// The constraint search exhausted its step budget.
    #[error("schedule search for check {check:?} exceeded its step budget")]
    ScheduleTimeout {
        /// The check whose solve was abandoned.
        check: CheckId,
    },

    /// A check was expected to be scheduled but is not.
    #[error("check {check:?} has no schedule")]
    MissingSchedule {
        /// The unscheduled check.
        check: CheckId,
    },

    /// Two checks interact with the same data qubit in the same time slot.
    #[error("checks {first:?} and {second:?} both use {qubit} at slot {slot}")]
    SlotCollision {
        /// The earlier check.
        first: CheckId,
        /// The later check.
        second: CheckId,
        /// The double-booked data qubit.
        qubit: QubitId,
        /// The colliding slot.
        slot: u32,
    },

    /// A differently-typed check pair orders its shared qubits with odd
    /// parity, which flips the joint stabilizer sign.
    #[error("checks {first:?} and {second:?} violate the commutation parity rule")]
    CommutationViolation {
        /// The earlier check.
        first: CheckId,
        /// The later check.
        second: CheckId,
    },

    /// Underlying model error.
    #[error(transparent)]
    Code(#[from] CodeError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
