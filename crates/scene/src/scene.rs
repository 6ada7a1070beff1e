use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use viewcore_common::{NodeId, NodeTransforms, Transform};

/// Errors from scene graph mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    #[error("parenting {node:?} under {parent:?} would create a cycle")]
    ParentCycle { node: NodeId, parent: NodeId },
}

/// Per-node data stored in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Transform relative to the parent (or the world, for root nodes).
    pub transform: Transform,
    parent: Option<NodeId>,
}

impl NodeData {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena of scene nodes.
///
/// Uses BTreeMap for deterministic iteration order. Components attached to
/// a node refer back to it by id only, so every query is fallible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: BTreeMap<NodeId, NodeData>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the scene.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read-only access to all nodes.
    pub fn nodes(&self) -> &BTreeMap<NodeId, NodeData> {
        &self.nodes
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Spawn a root node with the given transform. Returns its id.
    pub fn spawn(&mut self, transform: Transform) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(
            id,
            NodeData {
                transform,
                parent: None,
            },
        );
        id
    }

    /// Spawn a node parented under `parent`.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        transform: Transform,
    ) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = NodeId::new();
        self.nodes.insert(
            id,
            NodeData {
                transform,
                parent: Some(parent),
            },
        );
        Ok(id)
    }

    /// Remove a node. Its children become root nodes.
    pub fn despawn(&mut self, id: NodeId) -> Option<NodeData> {
        let data = self.nodes.remove(&id)?;
        for child in self.nodes.values_mut() {
            if child.parent == Some(id) {
                child.parent = None;
            }
        }
        tracing::debug!(node = ?id, "despawned node");
        Some(data)
    }

    /// Get a reference to node data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    /// Replace a node's local transform.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        let data = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        data.transform = transform;
        Ok(())
    }

    /// Re-parent a node. `None` makes it a root.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(SceneError::NodeNotFound(p));
            }
            // Walk up from the new parent; meeting `id` means a cycle.
            let mut cursor = Some(p);
            while let Some(c) = cursor {
                if c == id {
                    return Err(SceneError::ParentCycle { node: id, parent: p });
                }
                cursor = self.nodes.get(&c).and_then(|d| d.parent);
            }
        }
        if let Some(data) = self.nodes.get_mut(&id) {
            data.parent = parent;
        }
        Ok(())
    }

    /// Direct children of a node, in id order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, d)| d.parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Node-to-world matrix, composed through the parent chain.
    pub fn local_to_world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut data = self.nodes.get(&id)?;
        let mut matrix = data.transform.matrix();
        while let Some(parent) = data.parent {
            data = self.nodes.get(&parent)?;
            matrix = data.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// World-to-node matrix: the inverse of [`Self::local_to_world_matrix`].
    pub fn world_to_local_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.local_to_world_matrix(id).map(|m| m.inverse())
    }

    /// World-space forward direction (the node's local -Z axis).
    pub fn forward_vector(&self, id: NodeId) -> Option<Vec3> {
        self.local_to_world_matrix(id)
            .map(|m| m.transform_vector3(Vec3::NEG_Z).normalize_or_zero())
    }
}

impl NodeTransforms for Scene {
    fn world_to_local_matrix(&self, node: NodeId) -> Option<Mat4> {
        Scene::world_to_local_matrix(self, node)
    }

    fn forward_vector(&self, node: NodeId) -> Option<Vec3> {
        Scene::forward_vector(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn scene_starts_empty() {
        let s = Scene::new();
        assert_eq!(s.node_count(), 0);
    }

    #[test]
    fn spawn_and_despawn() {
        let mut s = Scene::new();
        let id = s.spawn(Transform::default());
        assert_eq!(s.node_count(), 1);
        assert!(s.get(id).is_some());

        assert!(s.despawn(id).is_some());
        assert_eq!(s.node_count(), 0);
        assert!(s.despawn(id).is_none());
    }

    #[test]
    fn spawn_child_requires_parent() {
        let mut s = Scene::new();
        let missing = NodeId::new();
        assert_eq!(
            s.spawn_child(missing, Transform::default()),
            Err(SceneError::NodeNotFound(missing))
        );
    }

    #[test]
    fn despawn_reparents_children_to_root() {
        let mut s = Scene::new();
        let parent = s.spawn(Transform::default());
        let child = s.spawn_child(parent, Transform::default()).unwrap();
        assert_eq!(s.get(child).unwrap().parent(), Some(parent));

        s.despawn(parent);
        assert_eq!(s.get(child).unwrap().parent(), None);
    }

    #[test]
    fn set_transform_missing_node() {
        let mut s = Scene::new();
        let id = NodeId::new();
        assert!(s.set_transform(id, Transform::default()).is_err());
    }

    #[test]
    fn set_parent_rejects_cycle() {
        let mut s = Scene::new();
        let a = s.spawn(Transform::default());
        let b = s.spawn_child(a, Transform::default()).unwrap();
        let c = s.spawn_child(b, Transform::default()).unwrap();

        assert_eq!(
            s.set_parent(a, Some(c)),
            Err(SceneError::ParentCycle { node: a, parent: c })
        );
        assert_eq!(
            s.set_parent(a, Some(a)),
            Err(SceneError::ParentCycle { node: a, parent: a })
        );
        assert!(s.set_parent(c, None).is_ok());
        assert!(s.children(b).is_empty());
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut s = Scene::new();
        let parent = s.spawn(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        let child = s
            .spawn_child(parent, Transform::from_position(Vec3::new(0.0, 5.0, 0.0)))
            .unwrap();

        let world = s.local_to_world_matrix(child).unwrap();
        assert!(approx(world.transform_point3(Vec3::ZERO), Vec3::new(10.0, 5.0, 0.0)));

        let inv = s.world_to_local_matrix(child).unwrap();
        assert!(approx(inv.transform_point3(Vec3::new(10.0, 5.0, 0.0)), Vec3::ZERO));
    }

    #[test]
    fn forward_vector_follows_rotation() {
        let mut s = Scene::new();
        let id = s.spawn(Transform::default());
        assert!(approx(s.forward_vector(id).unwrap(), Vec3::NEG_Z));

        s.set_transform(
            id,
            Transform {
                rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                scale: Vec3::splat(3.0),
                ..Transform::default()
            },
        )
        .unwrap();
        assert!(approx(s.forward_vector(id).unwrap(), Vec3::NEG_X));
    }

    #[test]
    fn queries_on_missing_node_are_none() {
        let s = Scene::new();
        let id = NodeId::new();
        assert!(s.local_to_world_matrix(id).is_none());
        assert!(NodeTransforms::world_to_local_matrix(&s, id).is_none());
        assert!(NodeTransforms::forward_vector(&s, id).is_none());
    }

    #[test]
    fn btreemap_gives_deterministic_iteration() {
        let mut s = Scene::new();
        for _ in 0..50 {
            s.spawn(Transform::default());
        }
        let keys: Vec<NodeId> = s.nodes().keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
