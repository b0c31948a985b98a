//! Runtime for executing dialogue turns
//!
//! Loads a session from storage, runs the pure transition and interprets the
//! resulting effects into a reply for the voice platform.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{DialogueRuntime, Reply, RuntimeError};
pub use traits::*;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = DialogueRuntime<MemorySessionStore>;
