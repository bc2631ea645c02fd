//! Error types for the PageBridge protocol layer.

mod bridge;
mod dom;
mod generation;
mod store;

pub use bridge::*;
pub use dom::*;
pub use generation::*;
pub use store::*;
