//! Dialogue turn executor

use super::traits::{SessionStore, StoredSession};
use crate::state_machine::{
    transition, Card, DialogueContext, Effect, Event, Session, TransitionError,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// What the platform speaks back for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub prompt_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt_text: Option<String>,
    pub should_end_session: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Stored session is unreadable: {0}")]
    CorruptSession(#[from] serde_json::Error),
    #[error("Session storage failed: {0}")]
    Storage(String),
    #[error("Turn produced nothing to say")]
    Silent,
}

/// Generic dialogue runtime over any session storage
pub struct DialogueRuntime<S: SessionStore> {
    context: Arc<DialogueContext>,
    sessions: S,
    /// One lock per session id; turns of the same session never interleave
    turn_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: SessionStore> DialogueRuntime<S> {
    pub fn new(context: Arc<DialogueContext>, sessions: S) -> Self {
        Self {
            context,
            sessions,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &Arc<DialogueContext> {
        &self.context
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Start a conversation under a fresh id and return the welcome reply
    pub async fn open(&self) -> Result<(String, Reply), RuntimeError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %session_id, "Opening session");
        let reply = self.handle(&session_id, Event::Launch).await?;
        Ok((session_id, reply))
    }

    /// Process one event to completion. Unknown ids start a new session and
    /// a session whose conversation ends is discarded.
    pub async fn handle(&self, session_id: &str, event: Event) -> Result<Reply, RuntimeError> {
        let lock = self.turn_lock(session_id).await;
        let reply = {
            let _turn = lock.lock().await;
            self.run_turn(session_id, event).await?
        };
        if reply.should_end_session {
            self.release_turn_lock(session_id, lock).await;
        }
        Ok(reply)
    }

    /// Caller holds the session's turn lock
    async fn run_turn(&self, session_id: &str, event: Event) -> Result<Reply, RuntimeError> {
        let session = match self.session(session_id).await? {
            Some(session) => session,
            None => {
                tracing::debug!(session_id, "No stored session, starting fresh");
                self.context.new_session()
            }
        };

        tracing::info!(
            session_id,
            phase = session.phase.as_str(),
            node = %session.current_node,
            event = event.name(),
            "Handling event"
        );

        let result = match transition(&session, &self.context, event) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(session_id, error = %e, "Event rejected");
                return Err(e.into());
            }
        };

        if result.new_state.phase != session.phase {
            tracing::info!(
                session_id,
                from = session.phase.as_str(),
                to = result.new_state.phase.as_str(),
                "Phase change"
            );
        }

        let mut reply = None;
        for effect in result.effects {
            if let Some(spoken) = self
                .execute_effect(session_id, &result.new_state, effect)
                .await?
            {
                reply = Some(spoken);
            }
        }
        let reply = reply.ok_or(RuntimeError::Silent)?;

        if reply.should_end_session {
            self.sessions
                .remove(session_id)
                .await
                .map_err(RuntimeError::Storage)?;
            tracing::info!(session_id, "Conversation ended, session discarded");
        }
        Ok(reply)
    }

    /// Raw stored attributes of a session
    pub async fn stored(&self, session_id: &str) -> Result<Option<StoredSession>, RuntimeError> {
        self.sessions
            .load(session_id)
            .await
            .map_err(RuntimeError::Storage)
    }

    /// Current state of a session, if one was stored
    pub async fn session(&self, session_id: &str) -> Result<Option<Session>, RuntimeError> {
        self.stored(session_id)
            .await?
            .map(|stored| Session::from_attributes(&stored.attributes))
            .transpose()
            .map_err(RuntimeError::from)
    }

    /// Forget a session. Returns whether it existed.
    pub async fn discard(&self, session_id: &str) -> Result<bool, RuntimeError> {
        let lock = self.turn_lock(session_id).await;
        let existed = {
            let _turn = lock.lock().await;
            self.sessions
                .remove(session_id)
                .await
                .map_err(RuntimeError::Storage)?
        };
        self.release_turn_lock(session_id, lock).await;
        if existed {
            tracing::info!(session_id, "Session discarded");
        }
        Ok(existed)
    }

    async fn turn_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.turn_locks
            .lock()
            .await
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the lock entry of a finished session. The entry stays while any
    /// other turn still holds a handle to it.
    async fn release_turn_lock(&self, session_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.turn_locks.lock().await;
        drop(lock);
        if locks
            .get(session_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(session_id);
        }
    }

    /// Run one effect; speech effects become the turn's reply
    async fn execute_effect(
        &self,
        session_id: &str,
        new_state: &Session,
        effect: Effect,
    ) -> Result<Option<Reply>, RuntimeError> {
        match effect {
            Effect::PersistSession => {
                let attributes = new_state.to_attributes()?;
                self.sessions
                    .save(session_id, attributes)
                    .await
                    .map_err(RuntimeError::Storage)?;
                Ok(None)
            }
            Effect::Ask { prompt, reprompt } => Ok(Some(Reply {
                prompt_text: prompt,
                reprompt_text: Some(reprompt),
                should_end_session: false,
                card: None,
            })),
            Effect::AskWithCard {
                prompt,
                reprompt,
                card,
            } => Ok(Some(Reply {
                prompt_text: prompt,
                reprompt_text: Some(reprompt),
                should_end_session: false,
                card: Some(card),
            })),
            Effect::Tell { prompt } => Ok(Some(Reply {
                prompt_text: prompt,
                reprompt_text: None,
                should_end_session: true,
                card: None,
            })),
            Effect::Fault { reason } => {
                tracing::error!(
                    session_id,
                    node = %new_state.current_node,
                    reason = %reason,
                    "Navigation failed, ending session"
                );
                Ok(None)
            }
        }
    }
}
