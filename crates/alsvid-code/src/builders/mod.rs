//! Code-family constructors.
//!
//! Each builder produces a fully-populated [`TannerModel`](crate::TannerModel).
//! Families with a known-good interaction order ship pre-seeded schedules;
//! the rest leave schedules empty for the compiler's schedule solver.

pub mod color;
pub mod hgp;
pub mod surface;

pub use color::{make_hexagonal, make_hycc_d4};
pub use hgp::make_hypergraph_product;
pub use surface::make_rotated;
