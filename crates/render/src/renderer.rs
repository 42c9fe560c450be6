use cubeview_camera::{Camera, ViewState};
use cubeview_scene::Scene;
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Presentation switch: filled faces or closed 3-edge triangle loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Solid,
    Wireframe,
}

impl RenderMode {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Solid => Self::Wireframe,
            Self::Wireframe => Self::Solid,
        };
    }
}

/// Everything a backend needs for one frame besides the scene itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    /// Projection (frustum plus camera translation) times the view orbit.
    pub view_proj: Mat4,
    /// Camera position, for specular shading.
    pub eye: glam::Vec3,
    pub mode: RenderMode,
}

impl FrameView {
    /// Assemble the fixed-pipeline matrix order: frustum projection with the
    /// camera translation folded in, then the render-time orbit rotations.
    pub fn compose(camera: &Camera, view: &ViewState, mode: RenderMode) -> Self {
        Self {
            view_proj: camera.rebuild_projection() * view.view_matrix(camera),
            eye: camera.position,
            mode,
        }
    }
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A renderer reads the scene and the frame view, then produces output; it
/// never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &Scene, frame: &FrameView) -> Self::Output;
}

/// Text renderer for headless use: prints lights, objects, and composed
/// model matrices. Used by the CLI and by tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, frame: &FrameView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene ({} lights, {} objects, {:?}) ===\n",
            scene.lights().len(),
            scene.objects().len(),
            frame.mode
        ));
        for (i, light) in scene.lights().iter().enumerate() {
            let p = light.position;
            out.push_str(&format!(
                "  light {i}: pos=({:.2}, {:.2}, {:.2}, {:.0}) color=({:.1}, {:.1}, {:.1}) k={:.2}\n",
                p.x, p.y, p.z, p.w, light.color.x, light.color.y, light.color.z, light.attenuation
            ));
        }
        for (i, object) in scene.objects().iter().enumerate() {
            let t = object.model_matrix().transform_point3(glam::Vec3::ZERO);
            out.push_str(&format!(
                "  object {i}: {} triangles, {} steps, origin->({:.2}, {:.2}, {:.2})\n",
                object.mesh.triangle_count(),
                object.transform_steps.len(),
                t.x,
                t.y,
                t.z
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeview_scene::demo_scene;

    #[test]
    fn toggle_flips_and_returns() {
        let mut mode = RenderMode::Solid;
        mode.toggle();
        assert_eq!(mode, RenderMode::Wireframe);
        mode.toggle();
        assert_eq!(mode, RenderMode::Solid);
    }

    #[test]
    fn frame_view_composes_projection_and_orbit() {
        let camera = Camera::default();
        let view = ViewState {
            x_view_angle: 30.0,
            y_view_angle: -10.0,
        };
        let frame = FrameView::compose(&camera, &view, RenderMode::Solid);
        let expected = camera.rebuild_projection() * view.view_matrix(&camera);
        assert!(frame.view_proj.abs_diff_eq(expected, 1e-6));
        assert_eq!(frame.eye, camera.position);
    }

    #[test]
    fn debug_renderer_reports_scene_shape() {
        let scene = demo_scene();
        let frame = FrameView::compose(
            &Camera::default(),
            &ViewState::default(),
            RenderMode::Wireframe,
        );
        let out = DebugTextRenderer::new().render(&scene, &frame);
        assert!(out.contains("3 lights"));
        assert!(out.contains("2 objects"));
        assert!(out.contains("Wireframe"));
        assert!(out.contains("12 triangles"));
    }

    #[test]
    fn debug_renderer_shows_composed_placement() {
        let scene = demo_scene();
        let frame =
            FrameView::compose(&Camera::default(), &ViewState::default(), RenderMode::Solid);
        let out = DebugTextRenderer::new().render(&scene, &frame);
        // Cube 1 is translated to x = -0.6 by its single step.
        assert!(out.contains("(-0.60, 0.00, 0.00)"), "{out}");
    }
}
