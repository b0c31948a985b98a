//! Moving through the tree
//!
//! `page` turns a node's children into a spoken menu window, `resolver` turns
//! an answer into the next node.

pub mod page;
pub mod resolver;

pub use page::{render, Page, PageEntry, RenderedPrompt, DEFAULT_PAGE_SIZE};
pub use resolver::{normalize_answer, NavigationError, Navigator, Resolution, SearchMode};
