//! Scene model: light sources and drawable objects with hierarchical transforms.
//!
//! # Invariants
//! - Vertex and normal buffers are parallel, equal-length, and triangle-aligned.
//! - Transform steps compose in sequence order; composition is not commutative.
//! - Object identity is positional (index into the scene's object list).

pub mod mesh;
pub mod scene;
pub mod transform;

pub use mesh::{SceneError, TriMesh, cube_mesh};
pub use scene::{Material, PointLight, Scene, SceneObject, demo_scene, marker_scene};
pub use transform::TransformStep;

pub fn crate_info() -> &'static str {
    "cubeview-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
