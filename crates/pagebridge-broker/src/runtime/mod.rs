//! Runtime adapters.

pub mod local;
