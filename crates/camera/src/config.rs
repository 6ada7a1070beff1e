use glam::Vec4;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{CameraError, CameraKind};

/// Defaults applied when a camera is initialized.
///
/// Every field is optional in YAML/JSON. Values are validated on load;
/// runtime setters on [`crate::Camera`] are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub near_clip: f32,
    pub far_clip: f32,
    pub ui_near_clip: f32,
    pub ui_far_clip: f32,
    /// Perspective field of view in degrees.
    pub field_of_view: f32,
    pub background_color: [f32; 4],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near_clip: 0.1,
            far_clip: 1000.0,
            ui_near_clip: 0.1,
            ui_far_clip: 100.0,
            field_of_view: 75.0,
            background_color: [0.2, 0.2, 0.2, 1.0],
        }
    }
}

impl CameraConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, CameraError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, CameraError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. `.yaml`/`.yml` parse as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        tracing::debug!(path = %path.display(), yaml = is_yaml, "loading camera config");
        if is_yaml {
            Self::from_yaml_str(&data)
        } else {
            Self::from_json_str(&data)
        }
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        if !(self.near_clip > 0.0 && self.near_clip < self.far_clip) {
            return Err(CameraError::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far (near={}, far={})",
                self.near_clip, self.far_clip
            )));
        }
        if !(self.ui_near_clip > 0.0 && self.ui_near_clip < self.ui_far_clip) {
            return Err(CameraError::InvalidConfig(format!(
                "ui clip planes must satisfy 0 < near < far (near={}, far={})",
                self.ui_near_clip, self.ui_far_clip
            )));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(CameraError::InvalidConfig(format!(
                "field of view must be in (0, 180), got {}",
                self.field_of_view
            )));
        }
        if self.background_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(CameraError::InvalidConfig(format!(
                "background color components must be in [0, 1], got {:?}",
                self.background_color
            )));
        }
        Ok(())
    }

    /// `(near, far)` for a camera kind.
    pub fn clip_planes(&self, kind: CameraKind) -> (f32, f32) {
        match kind {
            CameraKind::Ui => (self.ui_near_clip, self.ui_far_clip),
            _ => (self.near_clip, self.far_clip),
        }
    }

    pub fn background(&self) -> Vec4 {
        Vec4::from_array(self.background_color)
    }
}
