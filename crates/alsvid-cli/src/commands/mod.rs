//! CLI command implementations.

pub mod r#gen;
pub mod hgp;
pub mod schedule;
pub mod version;
