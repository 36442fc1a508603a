//! Alsvid QES emission
//!
//! This crate turns a scheduled, flag-planned Tanner model into a QES
//! program: a line-oriented instruction stream with `reset`/`h`/`cx`/
//! `measure` operations, `event` declarations comparing measurement
//! outcomes across rounds, and `obs` declarations defining logical
//! outcomes.
//!
//! # Example
//!
//! ```rust
//! use alsvid_code::{Basis, builders::make_rotated};
//! use alsvid_compile::FlagPlan;
//! use alsvid_qes::{ExperimentConfig, InteractionMode, MemoryExperiment};
//!
//! let model = make_rotated(3).unwrap();
//! let flags = FlagPlan::new(&model);
//! let config = ExperimentConfig {
//!     memory: Basis::Z,
//!     rounds: 2,
//!     mode: InteractionMode::PerCheck,
//! };
//! let program = MemoryExperiment::new(&model, &flags, config).emit().unwrap();
//! assert!(program.to_string().contains("measure"));
//! ```

pub mod emitter;
pub mod error;
pub mod events;
pub mod mode;
pub mod program;

pub use emitter::{ExperimentConfig, MemoryExperiment};
pub use error::{QesError, QesResult};
pub use events::{EventIndexer, MeasCounter};
pub use mode::{CheckLayout, InteractionLayout, InteractionMode, PlaquetteLayout};
pub use program::{Opcode, Program, Statement};
