//! Camera subsystem: projection strategies, camera components, camera registry.
//!
//! # Invariants
//! - Cached matrices change only through `recompute_matrices` or
//!   `notify_viewport_resized`, and always together.
//! - The registry never owns a camera; it maps camera ids to owner nodes.
//! - UI cameras are never registered.
//!
//! Inputs are trusted: a zero viewport height or an out-of-range field of
//! view produce non-finite matrices rather than errors.

mod camera;
mod config;
mod error;
mod projection;
mod registry;

pub use camera::{Camera, CameraState};
pub use config::CameraConfig;
pub use error::CameraError;
pub use projection::{
    CameraKind, Orthographic, Perspective, Projection, ProjectionParams, ProjectionStrategy,
    UI_DEPTH_OFFSET, UiScreenSpace,
};
pub use registry::CameraRegistry;

pub fn crate_info() -> &'static str {
    "viewcore-camera v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("camera"));
    }
}
