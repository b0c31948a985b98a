//! Pagination of child lists
//!
//! Children are offered in fixed-size windows. The cursor is the zero-based
//! offset of the window's first child; labels restart at 1 on every page.

use crate::tree::{Node, NodeId};
use std::fmt::Write;

/// Number of children offered per page
pub const DEFAULT_PAGE_SIZE: usize = 5;

const ANSWER_SUFFIX: &str = " Please answer with number";
const NEXT_SUFFIX: &str = " , say next to get more options";
const PREVIOUS_SUFFIX: &str = " , say previous to get back to precedent options";

/// One visible child and the number that selects it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub label: usize,
    pub child: NodeId,
}

/// The visible window of a child list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Cursor after repair; never past the end of the child list
    pub cursor: usize,
    pub entries: Vec<PageEntry>,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Page {
    pub fn compute(children: &[NodeId], cursor: usize, page_size: usize) -> Self {
        let size = page_size.max(1);
        let cursor = repair_cursor(cursor, children.len());
        let entries = children
            .iter()
            .skip(cursor)
            .take(size)
            .enumerate()
            .map(|(index, child)| PageEntry {
                label: index + 1,
                child: child.clone(),
            })
            .collect();

        Self {
            cursor,
            entries,
            has_next: cursor + size < children.len(),
            has_previous: cursor >= size,
        }
    }

    /// Child selected by a 1-based label
    pub fn child_at(&self, label: usize) -> Option<&NodeId> {
        label
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .map(|entry| &entry.child)
    }

    pub fn child_ids(&self) -> Vec<NodeId> {
        self.entries.iter().map(|entry| entry.child.clone()).collect()
    }
}

/// Cursors past the end restart at the first page. A cursor equal to the
/// child count is kept and shows an empty page.
pub fn repair_cursor(cursor: usize, len: usize) -> usize {
    if cursor > len {
        0
    } else {
        cursor
    }
}

pub fn advance(cursor: usize, page_size: usize) -> usize {
    cursor.saturating_add(page_size.max(1))
}

pub fn retreat(cursor: usize, page_size: usize) -> usize {
    cursor.saturating_sub(page_size.max(1))
}

/// A node's prompt, with its page of choices when it has children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub text: String,
    pub page: Option<Page>,
}

/// Render the spoken prompt for `node` with its window starting at `cursor`
pub fn render(node: &Node, cursor: usize, page_size: usize) -> RenderedPrompt {
    if !node.is_decision() {
        return RenderedPrompt {
            text: node.message.clone(),
            page: None,
        };
    }

    let page = Page::compute(&node.children, cursor, page_size);
    let mut text = node.message.clone();
    for (index, entry) in page.entries.iter().enumerate() {
        if index > 0 {
            text.push(',');
        }
        let _ = write!(text, " {} for {}", entry.label, entry.child);
    }
    text.push_str(ANSWER_SUFFIX);
    if page.has_next {
        text.push_str(NEXT_SUFFIX);
    }
    if page.has_previous {
        text.push_str(PREVIOUS_SUFFIX);
    }

    RenderedPrompt {
        text,
        page: Some(page),
    }
}
