//! Engine context for the camera subsystem.
//!
//! # Invariants
//! - A node owns at most one camera; removing the node destroys the camera first.
//! - Viewport changes reach every live camera through `set_viewport_size`.
//! - Renderer enumeration goes through the camera registry, so UI cameras
//!   are listed separately.

mod engine;

pub use engine::{Engine, EngineError};

pub fn crate_info() -> &'static str {
    "viewcore-engine v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("engine"));
    }
}
