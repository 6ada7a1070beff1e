//! Projection strategies.
//!
//! All matrices are right-handed with OpenGL clip space (z in [-1, 1]).
//! Strategies do no validation: callers supply a positive height, a field
//! of view inside (0, 180) and `0 < near < far`, or get NaN/inf back.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CameraError;

/// Depth at which UI content sits in front of the UI camera.
pub const UI_DEPTH_OFFSET: f32 = -10.0;

/// Numeric inputs shared by every projection strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub width: u32,
    pub height: u32,
    /// `width / height`, precomputed by the camera.
    pub aspect: f32,
    pub near_clip: f32,
    pub far_clip: f32,
}

/// Maps a camera's numeric parameters to a projection matrix.
pub trait ProjectionStrategy {
    fn compute_projection_matrix(&self, params: &ProjectionParams) -> Mat4;
}

/// Field-of-view projection. Depends on the aspect ratio, not the raw size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perspective {
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            field_of_view: 75.0,
        }
    }
}

impl ProjectionStrategy for Perspective {
    fn compute_projection_matrix(&self, params: &ProjectionParams) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.field_of_view.to_radians(),
            params.aspect,
            params.near_clip,
            params.far_clip,
        )
    }
}

/// Box projection over `[0, width] x [0, height] x [near, far]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Orthographic;

impl ProjectionStrategy for Orthographic {
    fn compute_projection_matrix(&self, params: &ProjectionParams) -> Mat4 {
        screen_box(params)
    }
}

/// Same box as [`Orthographic`]; the UI camera adds its depth offset when it
/// builds the view-projection matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiScreenSpace;

impl ProjectionStrategy for UiScreenSpace {
    fn compute_projection_matrix(&self, params: &ProjectionParams) -> Mat4 {
        screen_box(params)
    }
}

impl UiScreenSpace {
    /// Fixed view transform standing in for a scene node's world-to-local matrix.
    pub fn view_offset() -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, UI_DEPTH_OFFSET))
    }
}

fn screen_box(params: &ProjectionParams) -> Mat4 {
    Mat4::orthographic_rh_gl(
        0.0,
        params.width as f32,
        0.0,
        params.height as f32,
        params.near_clip,
        params.far_clip,
    )
}

/// The projection a camera owns, dispatching to one strategy per kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective(Perspective),
    Orthographic(Orthographic),
    UiScreenSpace(UiScreenSpace),
}

impl Projection {
    /// Default projection for a kind; `field_of_view` applies to perspective only.
    pub fn for_kind(kind: CameraKind, field_of_view: f32) -> Self {
        match kind {
            CameraKind::Perspective => Self::Perspective(Perspective { field_of_view }),
            CameraKind::Orthographic => Self::Orthographic(Orthographic),
            CameraKind::Ui => Self::UiScreenSpace(UiScreenSpace),
        }
    }

    pub fn kind(&self) -> CameraKind {
        match self {
            Self::Perspective(_) => CameraKind::Perspective,
            Self::Orthographic(_) => CameraKind::Orthographic,
            Self::UiScreenSpace(_) => CameraKind::Ui,
        }
    }

    /// Fixed view matrix used instead of the owner's transform, if any.
    pub fn view_offset(&self) -> Option<Mat4> {
        match self {
            Self::UiScreenSpace(_) => Some(UiScreenSpace::view_offset()),
            _ => None,
        }
    }

    /// Whether cameras of this kind enter the camera registry.
    pub fn registers(&self) -> bool {
        !matches!(self, Self::UiScreenSpace(_))
    }

    pub fn field_of_view(&self) -> Option<f32> {
        match self {
            Self::Perspective(p) => Some(p.field_of_view),
            _ => None,
        }
    }
}

impl ProjectionStrategy for Projection {
    fn compute_projection_matrix(&self, params: &ProjectionParams) -> Mat4 {
        match self {
            Self::Perspective(p) => p.compute_projection_matrix(params),
            Self::Orthographic(o) => o.compute_projection_matrix(params),
            Self::UiScreenSpace(u) => u.compute_projection_matrix(params),
        }
    }
}

/// Camera kind tag, used by configuration and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraKind {
    Perspective,
    Orthographic,
    Ui,
}

impl fmt::Display for CameraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CameraKind::Perspective => "perspective",
            CameraKind::Orthographic => "orthographic",
            CameraKind::Ui => "ui",
        };
        f.write_str(name)
    }
}

impl FromStr for CameraKind {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "perspective" | "persp" => Ok(CameraKind::Perspective),
            "orthographic" | "ortho" => Ok(CameraKind::Orthographic),
            "ui" | "ui_screen_space" => Ok(CameraKind::Ui),
            other => Err(CameraError::UnknownKind(other.to_string())),
        }
    }
}
