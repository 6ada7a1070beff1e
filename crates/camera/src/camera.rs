use glam::{Mat4, Vec3, Vec4};
use viewcore_common::{CameraId, NodeId, NodeTransforms, ViewportSource};

use crate::{
    CameraConfig, CameraError, CameraKind, CameraRegistry, Orthographic, Perspective, Projection,
    ProjectionParams, ProjectionStrategy, UiScreenSpace,
};

/// Lifecycle of a camera. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// Constructed, not yet initialized.
    Unregistered,
    /// Initialized; registered unless it is a UI camera.
    Active,
    /// Terminal.
    Destroyed,
}

/// A camera component attached to a scene node.
///
/// The camera caches its projection and view-projection matrices. Accessors
/// never recompute: the matrices reflect the state as of the last
/// [`Camera::recompute_matrices`] or [`Camera::notify_viewport_resized`].
/// The owner node is referenced by id only.
///
/// Cloning yields a new, unregistered camera with its own id; the copy never
/// shares a registry entry with the original.
#[derive(Debug)]
pub struct Camera {
    id: CameraId,
    owner: NodeId,
    projection: Projection,
    state: CameraState,
    near_clip: f32,
    far_clip: f32,
    width: u32,
    height: u32,
    aspect: f32,
    background_color: Vec4,
    projection_matrix: Mat4,
    view_projection_matrix: Mat4,
}

impl Clone for Camera {
    fn clone(&self) -> Self {
        Self {
            id: CameraId::new(),
            state: CameraState::Unregistered,
            ..*self
        }
    }
}

/// Everything a recompute produces, committed in one assignment.
struct Staged {
    width: u32,
    height: u32,
    aspect: f32,
    projection_matrix: Mat4,
    view_projection_matrix: Mat4,
}

impl Camera {
    /// Create an unregistered camera owned by `owner`.
    pub fn new(owner: NodeId, projection: Projection) -> Self {
        let config = CameraConfig::default();
        let (near_clip, far_clip) = config.clip_planes(projection.kind());
        Self {
            id: CameraId::new(),
            owner,
            projection,
            state: CameraState::Unregistered,
            near_clip,
            far_clip,
            width: 0,
            height: 0,
            aspect: 1.0,
            background_color: config.background(),
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        }
    }

    pub fn perspective(owner: NodeId) -> Self {
        Self::new(owner, Projection::Perspective(Perspective::default()))
    }

    pub fn orthographic(owner: NodeId) -> Self {
        Self::new(owner, Projection::Orthographic(Orthographic))
    }

    pub fn ui(owner: NodeId) -> Self {
        Self::new(owner, Projection::UiScreenSpace(UiScreenSpace))
    }

    /// Create a camera of the given kind with `config`'s field of view.
    pub fn with_kind(owner: NodeId, kind: CameraKind, config: &CameraConfig) -> Self {
        Self::new(owner, Projection::for_kind(kind, config.field_of_view))
    }

    /// [`Camera::initialize_with`] using [`CameraConfig::default`].
    pub fn initialize(
        &mut self,
        viewport: &impl ViewportSource,
        registry: &mut CameraRegistry,
    ) -> Result<(), CameraError> {
        self.initialize_with(&CameraConfig::default(), viewport, registry)
    }

    /// Reset to configured defaults, read the viewport size and register.
    ///
    /// UI cameras are not registered. Matrices are identity until the first
    /// recompute. A registering camera is left untouched if the registry has
    /// been torn down.
    pub fn initialize_with(
        &mut self,
        config: &CameraConfig,
        viewport: &impl ViewportSource,
        registry: &mut CameraRegistry,
    ) -> Result<(), CameraError> {
        self.ensure_alive()?;
        if self.projection.registers() && registry.is_torn_down() {
            return Err(CameraError::RegistryTornDown(self.id));
        }

        let size = viewport.viewport_size();
        let (near_clip, far_clip) = config.clip_planes(self.kind());
        self.aspect = 1.0;
        self.projection_matrix = Mat4::IDENTITY;
        self.view_projection_matrix = Mat4::IDENTITY;
        self.width = size.width;
        self.height = size.height;
        self.near_clip = near_clip;
        self.far_clip = far_clip;
        self.background_color = config.background();
        if let Projection::Perspective(p) = &mut self.projection {
            p.field_of_view = config.field_of_view;
        }

        if self.projection.registers() {
            registry.register(self.id, self.owner);
        }
        self.state = CameraState::Active;
        tracing::debug!(
            camera = %self.id,
            kind = %self.kind(),
            viewport = %size,
            "camera initialized"
        );
        Ok(())
    }

    /// Recompute aspect, projection and view-projection from current state.
    ///
    /// Fails without touching the cached values if the owner node is gone
    /// (UI cameras do not consult their owner) or the camera is destroyed.
    pub fn recompute_matrices(&mut self, nodes: &impl NodeTransforms) -> Result<(), CameraError> {
        self.ensure_alive()?;
        let staged = self.stage(self.width, self.height, nodes)?;
        self.commit(staged);
        Ok(())
    }

    /// Pick up the current viewport size, then recompute.
    ///
    /// The new size lands together with the matrices, so a failed recompute
    /// leaves the camera on its previous size.
    pub fn notify_viewport_resized(
        &mut self,
        viewport: &impl ViewportSource,
        nodes: &impl NodeTransforms,
    ) -> Result<(), CameraError> {
        self.ensure_alive()?;
        let size = viewport.viewport_size();
        let staged = self.stage(size.width, size.height, nodes)?;
        tracing::debug!(camera = %self.id, viewport = %size, "camera viewport resized");
        self.commit(staged);
        Ok(())
    }

    /// Deregister and mark destroyed. Safe to call repeatedly, and safe
    /// after the registry has been torn down.
    pub fn destroy(&mut self, registry: &mut CameraRegistry) {
        if self.state == CameraState::Destroyed {
            return;
        }
        if self.state == CameraState::Active && self.projection.registers() {
            registry.deregister(self.id);
        }
        self.state = CameraState::Destroyed;
        tracing::debug!(camera = %self.id, "camera destroyed");
    }

    fn ensure_alive(&self) -> Result<(), CameraError> {
        match self.state {
            CameraState::Destroyed => Err(CameraError::Destroyed(self.id)),
            _ => Ok(()),
        }
    }

    fn stage(
        &self,
        width: u32,
        height: u32,
        nodes: &impl NodeTransforms,
    ) -> Result<Staged, CameraError> {
        let aspect = width as f32 / height as f32;
        let params = ProjectionParams {
            width,
            height,
            aspect,
            near_clip: self.near_clip,
            far_clip: self.far_clip,
        };
        let projection_matrix = self.projection.compute_projection_matrix(&params);
        let view = match self.projection.view_offset() {
            Some(offset) => offset,
            None => nodes
                .world_to_local_matrix(self.owner)
                .ok_or(CameraError::OwnerMissing(self.owner))?,
        };
        Ok(Staged {
            width,
            height,
            aspect,
            projection_matrix,
            view_projection_matrix: projection_matrix * view,
        })
    }

    fn commit(&mut self, staged: Staged) {
        if !staged.view_projection_matrix.is_finite() {
            tracing::warn!(
                camera = %self.id,
                width = staged.width,
                height = staged.height,
                fov = ?self.field_of_view(),
                "camera matrices are not finite"
            );
        }
        self.width = staged.width;
        self.height = staged.height;
        self.aspect = staged.aspect;
        self.projection_matrix = staged.projection_matrix;
        self.view_projection_matrix = staged.view_projection_matrix;
        tracing::trace!(camera = %self.id, aspect = self.aspect, "camera matrices recomputed");
    }

    // ===== Queries: cached values, no recompute =====

    /// Registry identity of this camera.
    pub fn id(&self) -> CameraId {
        self.id
    }

    /// Scene node that owns this camera.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// True between initialize and destroy.
    pub fn is_active(&self) -> bool {
        self.state == CameraState::Active
    }

    /// Camera kind derived from the projection.
    pub fn kind(&self) -> CameraKind {
        self.projection.kind()
    }

    /// The projection strategy this camera dispatches to.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Cached projection matrix from the last recompute.
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Projection times the owner's world-to-local matrix (or the UI depth offset).
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    /// Near clip plane distance.
    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    /// Far clip plane distance.
    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    /// Width over height as of the last recompute.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Viewport width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clear color as RGBA.
    pub fn background_color(&self) -> Vec4 {
        self.background_color
    }

    /// Field of view in degrees, for perspective cameras.
    pub fn field_of_view(&self) -> Option<f32> {
        self.projection.field_of_view()
    }

    /// World-space view direction of the owner node.
    pub fn forward_vector(&self, nodes: &impl NodeTransforms) -> Option<Vec3> {
        nodes.forward_vector(self.owner)
    }

    // ===== Setters: trusted input, applied at the next recompute =====

    pub fn set_field_of_view(&mut self, degrees: f32) -> Result<(), CameraError> {
        match &mut self.projection {
            Projection::Perspective(p) => {
                p.field_of_view = degrees;
                Ok(())
            }
            _ => Err(CameraError::NotPerspective(self.id)),
        }
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near_clip = near;
        self.far_clip = far;
    }

    pub fn set_background_color(&mut self, color: Vec4) {
        self.background_color = color;
    }
}
