//! Shared types for the viewcore workspace.
//!
//! Handles are plain copyable ids. Nothing here owns a scene node or a
//! camera; crates that hold an id must tolerate it going stale.

mod source;
mod types;

pub use source::{NodeTransforms, ViewportSource};
pub use types::{CameraId, NodeId, Transform, ViewportSize};

pub fn crate_info() -> &'static str {
    "viewcore-common v0.1.0"
}
