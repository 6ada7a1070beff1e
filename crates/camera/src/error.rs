use viewcore_common::{CameraId, NodeId};

/// Errors from camera lifecycle, queries and configuration.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("owner node {0:?} no longer exists")]
    OwnerMissing(NodeId),
    #[error("camera {0} has been destroyed")]
    Destroyed(CameraId),
    #[error("camera {0} cannot register: camera registry has been torn down")]
    RegistryTornDown(CameraId),
    #[error("camera {0} has no field of view (not a perspective camera)")]
    NotPerspective(CameraId),
    #[error("unknown camera kind: {0}")]
    UnknownKind(String),
    #[error("invalid camera config: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
