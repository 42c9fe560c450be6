//! wgpu render backend for the cube viewer.
//!
//! Renders the scene's triangle-soup objects with Phong point-light shading.
//! Wireframe mode draws each triangle as a closed 3-edge loop through a line
//! pipeline; it is a presentation switch and shares all scene data with the
//! solid pipeline.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Mesh buffers are uploaded once; only transforms, materials, and camera
//!   uniforms change per frame.

mod gpu;
mod shaders;

pub use gpu::WgpuSceneRenderer;
