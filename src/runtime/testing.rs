//! Session stores for testing
//!
//! These stand in for real storage so the executor can be exercised without
//! shared state between tests.

use super::traits::*;
use crate::state_machine::Attributes;
use async_trait::async_trait;
use std::sync::Mutex;

// ============================================================================
// Recording Store
// ============================================================================

/// In-memory store that records every save in order
#[derive(Default)]
pub struct RecordingSessionStore {
    inner: MemorySessionStore,
    /// Session ids in the order they were saved
    pub saves: Mutex<Vec<String>>,
}

impl RecordingSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct session ids that were saved, in first-save order
    pub fn saved_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.saves.lock().unwrap().iter() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for RecordingSessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<StoredSession>, String> {
        self.inner.load(session_id).await
    }

    async fn save(&self, session_id: &str, attributes: Attributes) -> Result<(), String> {
        self.saves.lock().unwrap().push(session_id.to_string());
        self.inner.save(session_id, attributes).await
    }

    async fn remove(&self, session_id: &str) -> Result<bool, String> {
        self.inner.remove(session_id).await
    }
}

// ============================================================================
// Failing Store
// ============================================================================

/// Store whose every operation fails
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn load(&self, _session_id: &str) -> Result<Option<StoredSession>, String> {
        Err("storage offline".to_string())
    }

    async fn save(&self, _session_id: &str, _attributes: Attributes) -> Result<(), String> {
        Err("storage offline".to_string())
    }

    async fn remove(&self, _session_id: &str) -> Result<bool, String> {
        Err("storage offline".to_string())
    }
}
