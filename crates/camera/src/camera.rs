use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// World-space side length of the fixed virtual screen centered at the
/// origin. The frustum is derived from the camera position against this
/// screen, so the same world region stays framed as the camera moves.
pub const SCREEN_DIM: f32 = 10.0;

/// Errors from camera operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CameraError {
    #[error("camera at z = 0 cannot project onto the virtual screen")]
    DegenerateCamera,
    #[error("invalid frustum: near {near}, far {far}, left {left}, right {right}, bottom {bottom}, top {top}")]
    InvalidFrustum {
        near: f32,
        far: f32,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    },
}

/// Six-scalar truncated-pyramid view volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Frustum {
    /// Validated constructor enforcing the ordering invariants.
    pub fn new(
        near: f32,
        far: f32,
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
    ) -> Result<Self, CameraError> {
        if near <= 0.0 || far <= 0.0 || near >= far || left >= right || bottom >= top {
            return Err(CameraError::InvalidFrustum {
                near,
                far,
                left,
                right,
                bottom,
                top,
            });
        }
        Ok(Self {
            near,
            far,
            left,
            right,
            top,
            bottom,
        })
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Perspective projection matrix of the six scalars, in the classic
    /// fixed-pipeline (`glFrustum`) layout.
    pub fn projection_matrix(&self) -> Mat4 {
        let (n, f) = (self.near, self.far);
        let (l, r) = (self.left, self.right);
        let (b, t) = (self.bottom, self.top);
        Mat4::from_cols(
            Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
            Vec4::new(
                (r + l) / (r - l),
                (t + b) / (t - b),
                -(f + n) / (f - n),
                -1.0,
            ),
            Vec4::new(0.0, 0.0, -2.0 * f * n / (f - n), 0.0),
        )
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 200.0,
            left: -0.5,
            right: 0.5,
            top: 0.5,
            bottom: -0.5,
        }
    }
}

/// A discrete camera step along one fixed world axis.
///
/// Movement is deliberately not camera-relative: forward always decreases
/// world z, left always decreases world x, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl StepDirection {
    fn axis(self) -> Vec3 {
        match self {
            Self::Forward => Vec3::NEG_Z,
            Self::Back => Vec3::Z,
            Self::Left => Vec3::NEG_X,
            Self::Right => Vec3::X,
            Self::Up => Vec3::Y,
            Self::Down => Vec3::NEG_Y,
        }
    }
}

/// The camera: position, orientation axis/angle, and frustum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub orientation_axis: Vec3,
    /// Orientation angle in degrees.
    pub orientation_angle_deg: f32,
    pub frustum: Frustum,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.9, 0.0, 15.4),
            orientation_axis: Vec3::Z,
            orientation_angle_deg: 0.0,
            frustum: Frustum::default(),
        }
    }
}

impl Camera {
    pub fn at_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Recompute left/right/top/bottom from the current position, projecting
    /// the fixed virtual screen through the camera as a pinhole.
    ///
    /// Fails with [`CameraError::DegenerateCamera`] when `position.z == 0`
    /// and leaves the frustum unchanged; near and far are never touched.
    pub fn update_frustum_from_position(&mut self) -> Result<(), CameraError> {
        if self.position.z == 0.0 {
            return Err(CameraError::DegenerateCamera);
        }
        let half = SCREEN_DIM / 2.0;
        self.frustum.left = (-half - self.position.x) / self.position.z;
        self.frustum.right = (half - self.position.x) / self.position.z;
        self.frustum.top = (half - self.position.y) / self.position.z;
        self.frustum.bottom = (-half - self.position.y) / self.position.z;
        Ok(())
    }

    /// Step the position along a world axis and recompute the frustum.
    ///
    /// If the step lands the camera on `z == 0` the frustum recompute fails;
    /// the position delta still applies (the next valid step recovers).
    pub fn apply_step(
        &mut self,
        direction: StepDirection,
        magnitude: f32,
    ) -> Result<(), CameraError> {
        self.position += direction.axis() * magnitude;
        self.update_frustum_from_position()
    }

    /// Projection parameters for the current state: the frustum matrix
    /// composed with a translation by `-position`.
    ///
    /// Pure function of the camera; recomputed on demand rather than cached.
    pub fn rebuild_projection(&self) -> Mat4 {
        self.frustum.projection_matrix() * Mat4::from_translation(-self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frustum_rejects_inverted_bounds() {
        assert!(Frustum::new(1.0, 200.0, 0.5, -0.5, 0.5, -0.5).is_err());
        assert!(Frustum::new(1.0, 200.0, -0.5, 0.5, -0.5, 0.5).is_err());
        assert!(Frustum::new(-1.0, 200.0, -0.5, 0.5, 0.5, -0.5).is_err());
        assert!(Frustum::new(200.0, 1.0, -0.5, 0.5, 0.5, -0.5).is_err());
        assert!(Frustum::new(1.0, 200.0, -0.5, 0.5, 0.5, -0.5).is_ok());
    }

    #[test]
    fn frustum_recompute_matches_pinhole_formula() {
        // Camera at the original demo position; assert the formula output,
        // not the hardcoded startup defaults.
        let mut cam = Camera::default();
        cam.update_frustum_from_position().unwrap();
        let f = cam.frustum;
        assert!((f.left - (-5.0 - 0.9) / 15.4).abs() < 1e-6);
        assert!((f.right - (5.0 - 0.9) / 15.4).abs() < 1e-6);
        assert!((f.top - 5.0 / 15.4).abs() < 1e-6);
        assert!((f.bottom - (-5.0 / 15.4)).abs() < 1e-6);
        // Near/far untouched
        assert_eq!(f.near, 1.0);
        assert_eq!(f.far, 200.0);
    }

    #[test]
    fn frustum_recompute_preserves_ordering() {
        for pos in [
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(3.0, -2.0, 1.0),
            Vec3::new(-4.9, 4.9, 0.1),
            Vec3::new(100.0, -100.0, 55.0),
        ] {
            let mut cam = Camera::at_position(pos);
            cam.update_frustum_from_position().unwrap();
            assert!(cam.frustum.left < cam.frustum.right, "pos {pos:?}");
            assert!(cam.frustum.bottom < cam.frustum.top, "pos {pos:?}");
        }
    }

    #[test]
    fn degenerate_z_keeps_prior_frustum() {
        let mut cam = Camera::at_position(Vec3::new(1.0, 2.0, 0.0));
        let before = cam.frustum;
        assert_eq!(
            cam.update_frustum_from_position(),
            Err(CameraError::DegenerateCamera)
        );
        assert_eq!(cam.frustum, before);
    }

    #[test]
    fn forward_then_back_round_trips() {
        let mut cam = Camera::default();
        let z0 = cam.position.z;
        cam.apply_step(StepDirection::Forward, 0.2).unwrap();
        cam.apply_step(StepDirection::Back, 0.2).unwrap();
        assert!((cam.position.z - z0).abs() < 1e-6);
    }

    #[test]
    fn steps_move_along_world_axes() {
        let mut cam = Camera::default();
        let p0 = cam.position;
        cam.apply_step(StepDirection::Left, 0.2).unwrap();
        assert!((cam.position.x - (p0.x - 0.2)).abs() < 1e-6);
        cam.apply_step(StepDirection::Down, 0.2).unwrap();
        assert!((cam.position.y - (p0.y - 0.2)).abs() < 1e-6);
        // y and z untouched by an x step
        assert!((cam.position.z - p0.z).abs() < 1e-6);
    }

    #[test]
    fn sideways_step_shifts_frustum_window() {
        let mut cam = Camera::at_position(Vec3::new(0.0, 0.0, 10.0));
        cam.update_frustum_from_position().unwrap();
        let centered = cam.frustum;
        cam.apply_step(StepDirection::Right, 1.0).unwrap();
        // Moving right shifts both bounds left so the screen stays framed.
        assert!(cam.frustum.left < centered.left);
        assert!(cam.frustum.right < centered.right);
        assert!((cam.frustum.width() - centered.width()).abs() < 1e-6);
    }

    #[test]
    fn projection_composes_frustum_and_translation() {
        let cam = Camera::default();
        let expected =
            cam.frustum.projection_matrix() * Mat4::from_translation(-cam.position);
        assert!(cam.rebuild_projection().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn frustum_matrix_maps_near_corners_to_clip_edges() {
        let f = Frustum::default();
        let m = f.projection_matrix();
        // A point on the near plane's right edge lands at clip x/w = 1.
        let corner = m * Vec4::new(f.right, 0.0, -f.near, 1.0);
        assert!((corner.x / corner.w - 1.0).abs() < 1e-5);
        let corner = m * Vec4::new(f.left, f.bottom, -f.near, 1.0);
        assert!((corner.x / corner.w + 1.0).abs() < 1e-5);
        assert!((corner.y / corner.w + 1.0).abs() < 1e-5);
    }
}
