//! Alsvid compilation passes
//!
//! This crate turns a Tanner model into something a circuit emitter can
//! consume: it assigns every check a time-slot schedule for its data-qubit
//! interactions and plans the fault-tolerant flag ancillas.
//!
//! # Scheduling
//!
//! [`schedule_model`] runs the incremental constraint solve: checks are
//! processed in a fixed order, each against the finalized schedules of its
//! predecessors, minimizing per-check depth while preserving qubit
//! exclusivity and stabilizer commutation. [`verify_schedules`] is the
//! exact feasibility predicate, usable on externally supplied schedules.
//!
//! ```rust
//! use alsvid_code::builders::make_hycc_d4;
//! use alsvid_compile::{schedule_model, verify_schedules};
//!
//! let mut model = make_hycc_d4().unwrap();
//! schedule_model(&mut model).unwrap();
//! verify_schedules(&model).unwrap();
//! ```
//!
//! # Flag planning
//!
//! [`FlagPlan::add_flag`] registers a flag ancilla guarding a pair of data
//! qubits, computing the hook-error edge it would implicate; requests whose
//! propagation set is degenerate are dropped.

pub mod error;
pub mod flags;
pub mod schedule;

pub use error::{CompileError, CompileResult};
pub use flags::{Flag, FlagPlan, HookEdge};
pub use schedule::{schedule_model, verify_schedules};
