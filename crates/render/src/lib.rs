//! Rendering adapter: renderer-agnostic interface over the scene and camera.
//!
//! # Invariants
//! - Renderers never mutate the scene; frame state derives from scene,
//!   camera, and view.
//! - The solid/wireframe switch is presentation only, never a data change.

mod renderer;

pub use renderer::{DebugTextRenderer, FrameView, RenderMode, Renderer};

pub fn crate_info() -> &'static str {
    "cubeview-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
