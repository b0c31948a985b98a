//! Node types

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Marker in tree data for "pick the child by its position on the page"
const POSITION_MARKER: &str = "_NUMERIC_CHILD";

/// Marker in tree data for "search every node by tag or name"
const TAG_MARKER: &str = "_TAG";

/// Identity of a node: its unique name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where the conversation goes once a node has been answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum NextDirective {
    /// Go to a fixed node. Leaves point back at the root.
    Literal(NodeId),
    /// Pick the child at the spoken position of the visible page
    ResolveByPosition,
    /// Pick the first node whose tag contains (or whose name equals) the answer
    ResolveByTag,
}

impl NextDirective {
    /// Parse the directive string used in tree data files
    pub fn parse(raw: &str) -> Self {
        match raw {
            POSITION_MARKER => Self::ResolveByPosition,
            TAG_MARKER => Self::ResolveByTag,
            other => Self::Literal(NodeId::from(other)),
        }
    }

    /// The directive string used in tree data files
    pub fn as_raw(&self) -> &str {
        match self {
            Self::Literal(target) => target.as_str(),
            Self::ResolveByPosition => POSITION_MARKER,
            Self::ResolveByTag => TAG_MARKER,
        }
    }
}

/// Node record as it appears in tree data files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node: String,
    #[serde(rename = "gotoNode")]
    pub goto_node: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A node of the decision tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Spoken prompt; decision nodes get their page of choices appended
    pub message: String,
    pub children: Vec<NodeId>,
    pub next: NextDirective,
    /// Free text, possibly a comma-joined alias list
    pub tag: Option<String>,
    pub description: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, message: impl Into<String>, next: NextDirective) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            children: Vec::new(),
            next,
            tag: None,
            description: None,
        }
    }

    pub fn with_children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<NodeId>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// A decision node offers a menu of children
    pub fn is_decision(&self) -> bool {
        !self.children.is_empty()
    }

    /// Case-insensitive substring match against the tag field.
    ///
    /// `needle` must already be normalized (lower-case ASCII). Containment is
    /// deliberately weak: tag "10" also matches the answer "1".
    pub fn tag_contains(&self, needle: &str) -> bool {
        self.tag
            .as_deref()
            .is_some_and(|tag| tag.to_lowercase().contains(needle))
    }

    /// Case-insensitive equality against the node's own name
    pub fn name_matches(&self, answer: &str) -> bool {
        self.id.as_str().to_lowercase() == answer
    }
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Self {
            id: NodeId::from(record.node),
            message: record.message,
            children: record
                .children
                .unwrap_or_default()
                .into_iter()
                .map(NodeId::from)
                .collect(),
            next: NextDirective::parse(&record.goto_node),
            tag: record.tag,
            description: record.description,
        }
    }
}
