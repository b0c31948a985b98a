//! Node store

use super::node::{NextDirective, Node, NodeId, NodeRecord};
use rust_embed::Embed;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identity of the root node in the bundled tree
pub const DEFAULT_ROOT: &str = "0";

/// File name of the bundled tree
pub const DEFAULT_TREE: &str = "pokedex.json";

#[derive(Embed)]
#[folder = "data/"]
struct BundledTrees;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Failed to read tree file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed tree data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Bundled tree not found: {0}")]
    BundledMissing(String),
    #[error("Tree contains no nodes")]
    Empty,
    #[error("Duplicate node identity: {0}")]
    DuplicateNode(NodeId),
    #[error("Root node not found: {0}")]
    RootMissing(NodeId),
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Immutable, ordered collection of nodes.
///
/// Store order is significant: tag lookup returns the first match.
#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    root: NodeId,
}

impl NodeStore {
    pub fn new(nodes: Vec<Node>, root: impl Into<NodeId>) -> TreeResult<Self> {
        let root = root.into();
        if nodes.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(TreeError::DuplicateNode(node.id.clone()));
            }
        }

        if !index.contains_key(&root) {
            return Err(TreeError::RootMissing(root));
        }

        Ok(Self { nodes, index, root })
    }

    pub fn from_records(records: Vec<NodeRecord>, root: impl Into<NodeId>) -> TreeResult<Self> {
        Self::new(records.into_iter().map(Node::from).collect(), root)
    }

    /// Parse a JSON array of node records
    pub fn from_json(json: &[u8], root: impl Into<NodeId>) -> TreeResult<Self> {
        let records: Vec<NodeRecord> = serde_json::from_slice(json)?;
        Self::from_records(records, root)
    }

    /// Load a tree from a JSON file on disk
    pub fn load(path: impl AsRef<Path>, root: impl Into<NodeId>) -> TreeResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes, root)
    }

    /// Load the tree bundled into the binary
    pub fn bundled(root: impl Into<NodeId>) -> TreeResult<Self> {
        let file = BundledTrees::get(DEFAULT_TREE)
            .ok_or_else(|| TreeError::BundledMissing(DEFAULT_TREE.to_string()))?;
        Self::from_json(&file.data, root)
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    /// Index of a node in store order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// A leaf points straight back at the root. Unknown nodes are not leaves.
    pub fn is_leaf(&self, id: &str) -> bool {
        self.find(id)
            .is_some_and(|node| matches!(&node.next, NextDirective::Literal(target) if *target == self.root))
    }

    pub fn root(&self) -> &NodeId {
        &self.root
    }

    /// Nodes in store order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
