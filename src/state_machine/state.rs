//! Session state types

use crate::messages::Messages;
use crate::navigation::{SearchMode, DEFAULT_PAGE_SIZE};
use crate::tree::{NodeId, NodeStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Flat key-value map the platform keeps between turns
pub type Attributes = Map<String, Value>;

/// Phase of the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the user to start (or restart) the game
    #[default]
    Idle,
    /// A question is on the table, mid-traversal
    AwaitingAnswer,
    /// A leaf was reached; offering more detail or a replay
    Describing,
    /// Conversation over, no further input accepted
    Ended,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Ended)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingAnswer => "awaiting_answer",
            Phase::Describing => "describing",
            Phase::Ended => "ended",
        }
    }
}

/// Per-conversation state, exclusively owned by one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub phase: Phase,
    pub current_node: NodeId,
    /// Sticky once set by visiting a tag node
    #[serde(default)]
    pub search_mode: Option<SearchMode>,
    /// Zero-based offset of the visible window into the current node's children
    #[serde(default)]
    pub cursor: usize,
    /// Children shown by the last render; numeric answers index into this
    #[serde(default)]
    pub page: Vec<NodeId>,
    /// Last question asked, replayed when input is not understood
    #[serde(default)]
    pub last_prompt: String,
}

impl Session {
    /// Fresh session positioned on the root, waiting to start
    pub fn new(root: NodeId, welcome: impl Into<String>) -> Self {
        Self {
            phase: Phase::Idle,
            current_node: root,
            search_mode: None,
            cursor: 0,
            page: Vec::new(),
            last_prompt: welcome.into(),
        }
    }

    pub fn to_attributes(&self) -> Result<Attributes, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Attributes::new()),
        }
    }

    pub fn from_attributes(attributes: &Attributes) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(attributes.clone()))
    }
}

/// Process-wide configuration shared by every session (immutable)
#[derive(Debug, Clone)]
pub struct DialogueContext {
    pub store: Arc<NodeStore>,
    pub page_size: usize,
    pub messages: Messages,
    /// Prefix for leaf card images, `<base>/<node>.png`
    pub card_image_base_url: Option<String>,
}

impl DialogueContext {
    pub fn new(store: Arc<NodeStore>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
            messages: Messages::default(),
            card_image_base_url: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_card_image_base_url(mut self, base_url: Option<String>) -> Self {
        self.card_image_base_url = base_url;
        self
    }

    /// A session that has not started yet
    pub fn new_session(&self) -> Session {
        Session::new(self.store.root().clone(), self.messages.welcome.clone())
    }

    pub fn card_image_url(&self, node: &NodeId) -> Option<String> {
        self.card_image_base_url
            .as_deref()
            .map(|base| format!("{}/{node}.png", base.trim_end_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_round_trip_is_flat() {
        let session = Session {
            phase: Phase::AwaitingAnswer,
            current_node: "Water".into(),
            search_mode: Some(SearchMode::ByTag),
            cursor: 5,
            page: vec!["Poliwrath".into(), "Tentacool".into()],
            last_prompt: "Pick one".to_string(),
        };

        let attributes = session.to_attributes().unwrap();
        assert_eq!(attributes["phase"], "awaiting_answer");
        assert_eq!(attributes["current_node"], "Water");
        assert_eq!(attributes["search_mode"], "by_tag");
        assert_eq!(attributes["cursor"], 5);

        assert_eq!(Session::from_attributes(&attributes).unwrap(), session);
    }

    #[test]
    fn test_missing_optional_attributes_default() {
        let mut attributes = Attributes::new();
        attributes.insert("phase".to_string(), "idle".into());
        attributes.insert("current_node".to_string(), "0".into());

        let session = Session::from_attributes(&attributes).unwrap();
        assert_eq!(session.search_mode, None);
        assert_eq!(session.cursor, 0);
        assert!(session.page.is_empty());
    }

    #[test]
    fn test_card_image_url() {
        let store = NodeStore::bundled(crate::tree::DEFAULT_ROOT).unwrap();
        let ctx = DialogueContext::new(Arc::new(store))
            .with_card_image_base_url(Some("https://img.example/voxbot/".to_string()));

        assert_eq!(
            ctx.card_image_url(&"Pikachu".into()).as_deref(),
            Some("https://img.example/voxbot/Pikachu.png")
        );
    }
}
