//! Decision tree content
//!
//! The node store is loaded once at startup and shared read-only by every
//! session. Validation is a separate offline pass.

mod node;
mod store;
pub mod validate;

pub use node::{NextDirective, Node, NodeId, NodeRecord};
pub use store::{NodeStore, TreeError, TreeResult, DEFAULT_ROOT, DEFAULT_TREE};
pub use validate::{validate, Issue};
