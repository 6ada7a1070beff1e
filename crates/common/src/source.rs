use glam::{Mat4, Vec3};

use crate::{NodeId, ViewportSize};

/// Something that knows the current viewport size (normally the engine).
pub trait ViewportSource {
    fn viewport_size(&self) -> ViewportSize;
}

impl ViewportSource for ViewportSize {
    fn viewport_size(&self) -> ViewportSize {
        *self
    }
}

/// Read-only transform queries against the scene graph.
///
/// Cameras hold only a `NodeId` back to their owner, so both queries return
/// `None` once the node is gone.
pub trait NodeTransforms {
    /// Inverse of the node's world transform.
    fn world_to_local_matrix(&self, node: NodeId) -> Option<Mat4>;

    /// Normalized world-space forward direction of the node.
    fn forward_vector(&self, node: NodeId) -> Option<Vec3>;
}
