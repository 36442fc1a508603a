//! Alsvid code model
//!
//! This crate provides the Tanner-graph representation of quantum
//! error-correcting codes consumed by the Alsvid compilation stack, together
//! with constructors for the shipped code families and the plain-text
//! serialization format.
//!
//! # Overview
//!
//! A [`TannerModel`] is a bipartite structure of data qubits and X/Z parity
//! checks. Entities are typed records in dense arrays (no generic graph
//! library); each check carries an ordered support and, once compiled or
//! pre-seeded, a time-slot schedule. Color codes additionally group their
//! checks into [`Plaquette`]s.
//!
//! # Example: reading a code from text
//!
//! ```rust
//! use alsvid_code::{io, Basis};
//!
//! let model = io::parse_tanner_graph("Z0,0,1,2\nX0,0,1,2\nOZ0,0,1,2\n").unwrap();
//! assert_eq!(model.num_data_qubits(), 3);
//! assert_eq!(model.checks_of(Basis::Z).count(), 1);
//! ```
//!
//! # Example: building a color code
//!
//! ```rust
//! use alsvid_code::builders::make_hexagonal;
//!
//! let model = make_hexagonal(3, false).unwrap();
//! assert_eq!(model.plaquettes().len(), 3);
//! ```

pub mod builders;
pub mod error;
pub mod f2;
pub mod io;
pub mod ldpc;
pub mod model;

pub use error::{CodeError, CodeResult};
pub use model::{
    Basis, Check, CheckId, DataQubit, Plaquette, PlaquetteId, QubitId, TannerModel,
};
