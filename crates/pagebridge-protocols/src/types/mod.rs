//! Core data types.

mod context;
mod profile;

pub use context::*;
pub use profile::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
