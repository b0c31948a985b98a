//! HTTP API for delivering voice platform events

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::ProductionRuntime;
use crate::tree::Issue;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ProductionRuntime>,
    /// Validation issues found in the loaded tree at startup
    pub issues: Arc<Vec<Issue>>,
}

impl AppState {
    pub fn new(runtime: ProductionRuntime, issues: Vec<Issue>) -> Self {
        Self {
            runtime: Arc::new(runtime),
            issues: Arc::new(issues),
        }
    }
}
