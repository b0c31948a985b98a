//! Answer resolution
//!
//! Turns the current node, the active search mode and the user's raw answer
//! into the identity of the next node.

use crate::tree::{NextDirective, Node, NodeId, NodeStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// How answers are interpreted. Once a tag node has been visited the session
/// stays in tag mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Numbers pick a child of the visible page
    ByPosition,
    /// Text (or numbers) are looked up against every node's tag and name
    ByTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("In nodes array could not find node {0}")]
    NodeNotFound(NodeId),
    #[error("No child at position {position} of the current page")]
    PositionOutOfRange { position: String },
    #[error("No node matches tag or name '{0}'")]
    NoMatch(String),
    #[error("Expected a number, got '{0}'")]
    NotANumber(String),
    #[error("Answer is empty after normalization")]
    EmptyAnswer,
}

impl NavigationError {
    /// Unparseable input is re-prompted; everything else is a data error
    /// that ends the conversation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotANumber(_) | Self::EmptyAnswer)
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub next: NodeId,
    /// Mode the session must keep from now on, if the next node imposes one
    pub sticky_mode: Option<SearchMode>,
}

/// Resolves answers against a shared node store
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    store: &'a NodeStore,
}

impl<'a> Navigator<'a> {
    pub fn new(store: &'a NodeStore) -> Self {
        Self { store }
    }

    /// Resolve `answer` given in `mode` while positioned on `current`.
    ///
    /// `visible_page` is the window rendered on the previous turn; positions
    /// are relative to it, not to the full child list.
    pub fn resolve(
        &self,
        current: &NodeId,
        mode: SearchMode,
        visible_page: &[NodeId],
        answer: &str,
    ) -> Result<Resolution, NavigationError> {
        let next = match mode {
            SearchMode::ByTag => self.find_by_tag(answer)?,
            SearchMode::ByPosition => {
                let node = self
                    .store
                    .find(current.as_str())
                    .ok_or_else(|| NavigationError::NodeNotFound(current.clone()))?;
                match &node.next {
                    NextDirective::Literal(target) => self.existing(target)?,
                    NextDirective::ResolveByPosition => self.find_by_position(visible_page, answer)?,
                    NextDirective::ResolveByTag => self.find_by_tag(answer)?,
                }
            }
        };

        Ok(Resolution {
            sticky_mode: sticky_mode(next),
            next: next.id.clone(),
        })
    }

    fn existing(&self, id: &NodeId) -> Result<&'a Node, NavigationError> {
        self.store
            .find(id.as_str())
            .ok_or_else(|| NavigationError::NodeNotFound(id.clone()))
    }

    fn find_by_position(
        &self,
        visible_page: &[NodeId],
        answer: &str,
    ) -> Result<&'a Node, NavigationError> {
        let position = answer.trim();
        let digits = position
            .strip_prefix(['-', '+'])
            .unwrap_or(position);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NavigationError::NotANumber(answer.to_string()));
        }

        // Negative, zero and overflowing integers are numbers with no child
        let child = position
            .parse::<i64>()
            .ok()
            .and_then(|value| usize::try_from(value).ok())
            .and_then(|value| value.checked_sub(1))
            .and_then(|index| visible_page.get(index))
            .ok_or_else(|| NavigationError::PositionOutOfRange {
                position: position.to_string(),
            })?;
        self.existing(child)
    }

    /// First node in store order whose tag contains the answer or whose name
    /// equals it
    fn find_by_tag(&self, answer: &str) -> Result<&'a Node, NavigationError> {
        let needle = normalize_answer(answer);
        if needle.is_empty() {
            return Err(NavigationError::EmptyAnswer);
        }
        self.store
            .iter()
            .find(|node| node.tag_contains(&needle) || node.name_matches(&needle))
            .ok_or(NavigationError::NoMatch(needle))
    }
}

/// Mode imposed on the session by arriving at `node`
pub fn sticky_mode(node: &Node) -> Option<SearchMode> {
    (node.next == NextDirective::ResolveByTag).then_some(SearchMode::ByTag)
}

/// Lower-case, fold diacritics to their base letter, keep only `[a-z0-9]`
pub fn normalize_answer(raw: &str) -> String {
    raw.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
