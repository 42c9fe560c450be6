//! Camera model: position, orientation, and a six-scalar viewing frustum.
//!
//! # Invariants
//! - `near < far`, `left < right`, `bottom < top`, `near > 0`.
//! - The frustum is recomputed after every position mutation; a camera at
//!   `z == 0` is degenerate and the prior frustum is kept.

pub mod camera;
pub mod view;

pub use camera::{Camera, CameraError, Frustum, SCREEN_DIM, StepDirection};
pub use view::ViewState;

pub fn crate_info() -> &'static str {
    "cubeview-camera v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("camera"));
    }
}
