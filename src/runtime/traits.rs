//! Trait abstractions for runtime I/O
//!
//! Session storage sits behind a trait so the executor can be tested with a
//! recording store.

use crate::state_machine::Attributes;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A persisted session as the platform stores it between turns
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub attributes: Attributes,
    pub updated_at: DateTime<Utc>,
}

/// Storage for per-session attribute maps
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session's attributes, `None` if it was never saved
    async fn load(&self, session_id: &str) -> Result<Option<StoredSession>, String>;

    /// Replace a session's attributes
    async fn save(&self, session_id: &str, attributes: Attributes) -> Result<(), String>;

    /// Discard a session. Returns whether it existed.
    async fn remove(&self, session_id: &str) -> Result<bool, String>;
}

// ============================================================================
// Arc implementation for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn load(&self, session_id: &str) -> Result<Option<StoredSession>, String> {
        (**self).load(session_id).await
    }

    async fn save(&self, session_id: &str, attributes: Attributes) -> Result<(), String> {
        (**self).save(session_id, attributes).await
    }

    async fn remove(&self, session_id: &str) -> Result<bool, String> {
        (**self).remove(session_id).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Process-local session storage shared by every conversation
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<StoredSession>, String> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn save(&self, session_id: &str, attributes: Attributes) -> Result<(), String> {
        self.sessions.write().await.insert(
            session_id.to_string(),
            StoredSession {
                attributes,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<bool, String> {
        Ok(self.sessions.write().await.remove(session_id).is_some())
    }
}
