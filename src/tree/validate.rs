//! Offline tree validation
//!
//! A pure pass over the whole store that reports authoring mistakes. It keeps
//! no state of its own and is never run per request.

use super::node::{NextDirective, NodeId};
use super::store::NodeStore;
use serde::Serialize;
use std::collections::VecDeque;
use thiserror::Error;

/// A problem found in the tree data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    #[error("node '{parent}' lists unknown child '{child}'")]
    MissingChild { parent: NodeId, child: NodeId },

    #[error("node '{node}' points to unknown node '{target}'")]
    MissingTarget { node: NodeId, target: NodeId },

    #[error("cycle: {}", format_path(.path))]
    Cycle { path: Vec<NodeId> },

    #[error("node '{node}' cannot be reached from the root by browsing")]
    Unreachable { node: NodeId },

    #[error("node '{node}' resolves answers by position but has no children")]
    PositionWithoutChildren { node: NodeId },

    #[error("leaf '{node}' has no description")]
    LeafWithoutDescription { node: NodeId },
}

fn format_path(path: &[NodeId]) -> String {
    path.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Check every node of the store and return all issues found
pub fn validate(store: &NodeStore) -> Vec<Issue> {
    let nodes: Vec<_> = store.iter().collect();
    let position_of = |id: &NodeId| store.position(id.as_str());
    let mut issues = Vec::new();

    // Edges followed by the conversation, ignoring the leaf -> root restart
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut child_edges: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];

    for (from, node) in nodes.iter().enumerate() {
        for child in &node.children {
            match position_of(child) {
                Some(to) => {
                    edges[from].push(to);
                    child_edges[from].push(to);
                }
                None => issues.push(Issue::MissingChild {
                    parent: node.id.clone(),
                    child: child.clone(),
                }),
            }
        }

        match &node.next {
            NextDirective::Literal(target) if target == store.root() => {
                if node.description.is_none() {
                    issues.push(Issue::LeafWithoutDescription {
                        node: node.id.clone(),
                    });
                }
            }
            NextDirective::Literal(target) => match position_of(target) {
                Some(to) => edges[from].push(to),
                None => issues.push(Issue::MissingTarget {
                    node: node.id.clone(),
                    target: target.clone(),
                }),
            },
            NextDirective::ResolveByPosition if node.children.is_empty() => {
                issues.push(Issue::PositionWithoutChildren {
                    node: node.id.clone(),
                });
            }
            NextDirective::ResolveByPosition | NextDirective::ResolveByTag => {}
        }
    }

    for cycle in find_cycles(&edges) {
        issues.push(Issue::Cycle {
            path: cycle.into_iter().map(|i| nodes[i].id.clone()).collect(),
        });
    }

    if let Some(root) = position_of(store.root()) {
        let reached = reachable_from(root, &child_edges);
        for (position, node) in nodes.iter().enumerate() {
            if !reached[position] {
                issues.push(Issue::Unreachable {
                    node: node.id.clone(),
                });
            }
        }
    }

    issues
}

/// Iterative depth-first search; each back edge yields one cycle, closed on
/// its starting node.
fn find_cycles(edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; edges.len()];
    let mut cycles = Vec::new();

    for start in 0..edges.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::OnPath;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, next_edge) = *frame;
            if let Some(&target) = edges[node].get(next_edge) {
                frame.1 += 1;
                match marks[target] {
                    Mark::Unvisited => {
                        marks[target] = Mark::OnPath;
                        stack.push((target, 0));
                    }
                    Mark::OnPath => {
                        let from = stack
                            .iter()
                            .position(|&(n, _)| n == target)
                            .unwrap_or(0);
                        let mut cycle: Vec<usize> = stack[from..].iter().map(|&(n, _)| n).collect();
                        cycle.push(target);
                        cycles.push(cycle);
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }

    cycles
}

fn reachable_from(root: usize, edges: &[Vec<usize>]) -> Vec<bool> {
    let mut reached = vec![false; edges.len()];
    let mut queue = VecDeque::from([root]);
    reached[root] = true;

    while let Some(node) = queue.pop_front() {
        for &next in &edges[node] {
            if !reached[next] {
                reached[next] = true;
                queue.push_back(next);
            }
        }
    }

    reached
}
