//! Scene graph: node arena, parent links, transform queries.
//!
//! # Invariants
//! - Nodes are addressed by `NodeId`; nothing outside the arena owns a node.
//! - The parent chain of every node is acyclic.

pub mod scene;

pub use scene::{NodeData, Scene, SceneError};

pub fn crate_info() -> &'static str {
    "viewcore-scene v0.1.0"
}
