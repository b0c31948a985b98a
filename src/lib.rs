//! Voxbot - voice-driven decision tree navigator
//!
//! Walks a user through a tree of questions one spoken turn at a time:
//! numbered menus with paging, direct lookups by tag or name, and a short
//! description once a leaf is reached.

pub mod api;
pub mod config;
pub mod messages;
pub mod navigation;
pub mod runtime;
pub mod state_machine;
pub mod tree;
