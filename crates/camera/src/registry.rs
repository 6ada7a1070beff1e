use std::collections::BTreeMap;
use viewcore_common::{CameraId, NodeId};

/// Non-owning index of active cameras, keyed by camera id.
///
/// Each entry records the node that owns the camera, so a renderer can
/// enumerate cameras and resolve them through the scene. Enumeration order
/// is the id order and carries no meaning.
///
/// Once [`CameraRegistry::tear_down`] has run, registration is refused and
/// deregistration is a no-op, so cameras destroyed during shutdown never
/// fault on a dead registry.
#[derive(Debug, Default)]
pub struct CameraRegistry {
    entries: BTreeMap<CameraId, NodeId>,
    torn_down: bool,
}

impl CameraRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a camera. Returns `true` if it was not already present.
    pub fn register(&mut self, camera: CameraId, owner: NodeId) -> bool {
        if self.torn_down {
            tracing::warn!(%camera, "register on torn-down camera registry ignored");
            return false;
        }
        let inserted = self.entries.insert(camera, owner).is_none();
        if inserted {
            tracing::debug!(%camera, count = self.entries.len(), "camera registered");
        }
        inserted
    }

    /// Remove a camera. Returns `true` if it was present.
    pub fn deregister(&mut self, camera: CameraId) -> bool {
        let removed = self.entries.remove(&camera).is_some();
        if removed {
            tracing::debug!(%camera, count = self.entries.len(), "camera deregistered");
        }
        removed
    }

    pub fn contains(&self, camera: CameraId) -> bool {
        self.entries.contains_key(&camera)
    }

    /// Owner node recorded for a registered camera.
    pub fn owner_of(&self, camera: CameraId) -> Option<NodeId> {
        self.entries.get(&camera).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered cameras with their owner nodes.
    pub fn iter(&self) -> impl Iterator<Item = (CameraId, NodeId)> + '_ {
        self.entries.iter().map(|(c, n)| (*c, *n))
    }

    /// Drop every entry and refuse further registrations.
    pub fn tear_down(&mut self) {
        tracing::debug!(remaining = self.entries.len(), "camera registry torn down");
        self.entries.clear();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let mut reg = CameraRegistry::new();
        let cam = CameraId::new();
        let node = NodeId::new();
        assert!(reg.register(cam, node));
        assert!(!reg.register(cam, node));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.owner_of(cam), Some(node));
    }

    #[test]
    fn deregister_absent_is_noop() {
        let mut reg = CameraRegistry::new();
        assert!(!reg.deregister(CameraId::new()));
        assert!(reg.is_empty());
    }

    #[test]
    fn register_deregister_counts() {
        let mut reg = CameraRegistry::new();
        let ids: Vec<CameraId> = (0..10).map(|_| CameraId::new()).collect();
        for id in &ids {
            reg.register(*id, NodeId::new());
        }
        for id in ids.iter().take(4) {
            assert!(reg.deregister(*id));
        }
        assert_eq!(reg.len(), 6);
        for id in ids.iter().skip(4) {
            assert!(reg.contains(*id));
        }
        let listed: Vec<CameraId> = reg.iter().map(|(c, _)| c).collect();
        assert_eq!(listed.len(), 6);
        assert!(listed.iter().all(|c| ids[4..].contains(c)));
    }

    #[test]
    fn torn_down_registry_refuses_and_tolerates() {
        let mut reg = CameraRegistry::new();
        let cam = CameraId::new();
        reg.register(cam, NodeId::new());
        reg.tear_down();

        assert!(reg.is_torn_down());
        assert!(reg.is_empty());
        assert!(!reg.deregister(cam));
        assert!(!reg.register(CameraId::new(), NodeId::new()));
        assert!(reg.is_empty());
    }
}
