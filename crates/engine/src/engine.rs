use std::collections::BTreeMap;
use viewcore_camera::{Camera, CameraConfig, CameraError, CameraKind, CameraRegistry};
use viewcore_common::{CameraId, NodeId, ViewportSize, ViewportSource};
use viewcore_scene::{NodeData, Scene, SceneError};

/// Errors from engine-level camera management.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    #[error("node {0:?} already has a camera")]
    CameraAlreadyAttached(NodeId),
    #[error("node {0:?} has no camera")]
    NoCamera(NodeId),
    #[error("engine has been shut down")]
    ShutDown,
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Owns the scene, the viewport size, the camera registry and every camera
/// component.
///
/// Cameras live in a per-node slot, so the node is the sole owner. The
/// registry and the cameras refer to each other and to nodes by id only.
#[derive(Debug)]
pub struct Engine {
    scene: Scene,
    cameras: BTreeMap<NodeId, Camera>,
    registry: CameraRegistry,
    viewport: ViewportSize,
    config: CameraConfig,
    frame: u64,
}

impl Engine {
    pub fn new(viewport: ViewportSize) -> Self {
        Self::with_config(viewport, CameraConfig::default())
    }

    pub fn with_config(viewport: ViewportSize, config: CameraConfig) -> Self {
        Self {
            scene: Scene::new(),
            cameras: BTreeMap::new(),
            registry: CameraRegistry::new(),
            viewport,
            config,
            frame: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access. Despawn through [`Engine::despawn_node`] so
    /// attached cameras are destroyed.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn registry(&self) -> &CameraRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Number of completed update passes.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_shut_down(&self) -> bool {
        self.registry.is_torn_down()
    }

    /// Attach and initialize a camera on `node`.
    ///
    /// Matrices are identity until the next [`Engine::update`].
    pub fn attach_camera(
        &mut self,
        node: NodeId,
        kind: CameraKind,
    ) -> Result<CameraId, EngineError> {
        if self.is_shut_down() {
            return Err(EngineError::ShutDown);
        }
        if !self.scene.contains(node) {
            return Err(EngineError::NodeNotFound(node));
        }
        if self.cameras.contains_key(&node) {
            return Err(EngineError::CameraAlreadyAttached(node));
        }
        let mut camera = Camera::with_kind(node, kind, &self.config);
        camera.initialize_with(&self.config, &self.viewport, &mut self.registry)?;
        let id = camera.id();
        self.cameras.insert(node, camera);
        tracing::info!(camera = %id, %kind, "camera attached");
        Ok(id)
    }

    /// Destroy and remove the camera on `node`.
    pub fn detach_camera(&mut self, node: NodeId) -> Result<Camera, EngineError> {
        let mut camera = self.cameras.remove(&node).ok_or(EngineError::NoCamera(node))?;
        camera.destroy(&mut self.registry);
        Ok(camera)
    }

    /// Despawn a node, destroying its camera first.
    pub fn despawn_node(&mut self, node: NodeId) -> Option<NodeData> {
        if let Some(mut camera) = self.cameras.remove(&node) {
            camera.destroy(&mut self.registry);
        }
        self.scene.despawn(node)
    }

    pub fn camera(&self, node: NodeId) -> Option<&Camera> {
        self.cameras.get(&node)
    }

    pub fn camera_mut(&mut self, node: NodeId) -> Option<&mut Camera> {
        self.cameras.get_mut(&node)
    }

    /// Look a camera up by id, registered or not.
    pub fn camera_by_id(&self, id: CameraId) -> Option<&Camera> {
        match self.registry.owner_of(id) {
            Some(node) => self.cameras.get(&node).filter(|c| c.id() == id),
            None => self.cameras.values().find(|c| c.id() == id),
        }
    }

    /// Total number of attached cameras, UI cameras included.
    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Registered cameras, for the renderer's per-frame enumeration.
    pub fn active_cameras(&self) -> Vec<&Camera> {
        self.registry
            .iter()
            .filter_map(|(id, node)| self.cameras.get(&node).filter(|c| c.id() == id))
            .collect()
    }

    /// UI cameras, which the registry never lists.
    pub fn ui_cameras(&self) -> Vec<&Camera> {
        self.cameras
            .values()
            .filter(|c| c.kind() == CameraKind::Ui && c.is_active())
            .collect()
    }

    /// One update pass: recompute every active camera.
    ///
    /// A camera that fails (owner node removed behind the engine's back)
    /// keeps its previous matrices. Returns how many cameras recomputed.
    pub fn update(&mut self) -> usize {
        let _span = tracing::info_span!("camera_update", frame = self.frame).entered();
        let mut updated = 0;
        for camera in self.cameras.values_mut().filter(|c| c.is_active()) {
            match camera.recompute_matrices(&self.scene) {
                Ok(()) => updated += 1,
                Err(e) => tracing::warn!(camera = %camera.id(), "camera recompute skipped: {e}"),
            }
        }
        self.frame += 1;
        tracing::trace!(updated, "camera update complete");
        updated
    }

    pub fn viewport_size(&self) -> ViewportSize {
        self.viewport
    }

    /// Record a new viewport size and notify every active camera.
    pub fn set_viewport_size(&mut self, size: ViewportSize) {
        tracing::info!(from = %self.viewport, to = %size, "viewport resized");
        self.viewport = size;
        for camera in self.cameras.values_mut().filter(|c| c.is_active()) {
            if let Err(e) = camera.notify_viewport_resized(&size, &self.scene) {
                tracing::warn!(camera = %camera.id(), "camera resize skipped: {e}");
            }
        }
    }

    /// Tear the registry down, then destroy every camera.
    pub fn shutdown(&mut self) {
        if self.is_shut_down() {
            return;
        }
        tracing::info!(cameras = self.cameras.len(), "engine shutting down");
        self.registry.tear_down();
        for camera in self.cameras.values_mut() {
            camera.destroy(&mut self.registry);
        }
        self.cameras.clear();
    }
}

impl ViewportSource for Engine {
    fn viewport_size(&self) -> ViewportSize {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewcore_common::Transform;

    #[test]
    fn attach_requires_node() {
        let mut engine = Engine::new(ViewportSize::new(800, 600));
        let node = NodeId::new();
        assert!(matches!(
            engine.attach_camera(node, CameraKind::Perspective),
            Err(EngineError::NodeNotFound(n)) if n == node
        ));
    }

    #[test]
    fn one_camera_per_node() {
        let mut engine = Engine::new(ViewportSize::new(800, 600));
        let node = engine.scene_mut().spawn(Transform::default());
        engine.attach_camera(node, CameraKind::Perspective).unwrap();
        assert!(matches!(
            engine.attach_camera(node, CameraKind::Orthographic),
            Err(EngineError::CameraAlreadyAttached(_))
        ));
        assert_eq!(engine.camera_count(), 1);
    }

    #[test]
    fn attached_camera_reads_viewport_and_config() {
        let config = CameraConfig {
            field_of_view: 60.0,
            ..CameraConfig::default()
        };
        let mut engine = Engine::with_config(ViewportSize::new(640, 480), config);
        let node = engine.scene_mut().spawn(Transform::default());
        let id = engine.attach_camera(node, CameraKind::Perspective).unwrap();

        let cam = engine.camera_by_id(id).unwrap();
        assert_eq!((cam.width(), cam.height()), (640, 480));
        assert_eq!(cam.field_of_view(), Some(60.0));
        assert_eq!(engine.frame(), 0);
    }

    #[test]
    fn detach_missing_camera() {
        let mut engine = Engine::new(ViewportSize::new(800, 600));
        let node = engine.scene_mut().spawn(Transform::default());
        assert!(matches!(engine.detach_camera(node), Err(EngineError::NoCamera(_))));
    }

    #[test]
    fn update_counts_recomputed_cameras() {
        let mut engine = Engine::new(ViewportSize::new(800, 600));
        for kind in [CameraKind::Perspective, CameraKind::Orthographic, CameraKind::Ui] {
            let node = engine.scene_mut().spawn(Transform::default());
            engine.attach_camera(node, kind).unwrap();
        }
        assert_eq!(engine.update(), 3);
        assert_eq!(engine.frame(), 1);
    }

    #[test]
    fn update_skips_camera_with_removed_owner() {
        let mut engine = Engine::new(ViewportSize::new(800, 600));
        let node = engine.scene_mut().spawn(Transform::default());
        engine.attach_camera(node, CameraKind::Perspective).unwrap();
        engine.update();
        let before = *engine.camera(node).unwrap().view_projection_matrix();

        // Bypass despawn_node: the camera's back-reference goes stale.
        engine.scene_mut().despawn(node);
        assert_eq!(engine.update(), 0);
        assert_eq!(*engine.camera(node).unwrap().view_projection_matrix(), before);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut engine = Engine::new(ViewportSize::new(800, 600));
        let node = engine.scene_mut().spawn(Transform::default());
        engine.attach_camera(node, CameraKind::Perspective).unwrap();
        engine.shutdown();
        engine.shutdown();
        assert!(engine.is_shut_down());
        assert_eq!(engine.camera_count(), 0);
        assert!(matches!(
            engine.attach_camera(node, CameraKind::Perspective),
            Err(EngineError::ShutDown)
        ));
    }
}
