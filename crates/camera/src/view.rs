use crate::camera::Camera;
use glam::{Mat4, Quat};
use serde::{Deserialize, Serialize};

/// Free orbit angles applied at render time on top of the camera's fixed
/// orientation. Both are in degrees; `y_view_angle` is bounded to
/// `[-90, 90]`, `x_view_angle` wraps implicitly through periodic rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub x_view_angle: f32,
    pub y_view_angle: f32,
}

impl ViewState {
    /// Accumulate an orbit delta in degrees.
    ///
    /// A y delta that would leave `[-90, 90]` is rejected wholesale and the
    /// previous vertical angle kept; the x axis accumulates without bound.
    pub fn orbit(&mut self, dx_deg: f32, dy_deg: f32) {
        self.x_view_angle += dx_deg;
        let candidate = self.y_view_angle + dy_deg;
        if (-90.0..=90.0).contains(&candidate) {
            self.y_view_angle = candidate;
        }
    }

    /// The render-time view rotation: vertical orbit about x, horizontal
    /// orbit about y, then the inverse of the camera's fixed orientation.
    pub fn view_matrix(&self, camera: &Camera) -> Mat4 {
        let orbit_y = Mat4::from_rotation_x(self.y_view_angle.to_radians());
        let orbit_x = Mat4::from_rotation_y(self.x_view_angle.to_radians());
        let orientation = if camera.orientation_axis.length_squared() > 0.0 {
            Mat4::from_quat(Quat::from_axis_angle(
                camera.orientation_axis.normalize(),
                -camera.orientation_angle_deg.to_radians(),
            ))
        } else {
            Mat4::IDENTITY
        };
        orbit_y * orbit_x * orientation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_angle_accumulates_without_bound() {
        let mut view = ViewState::default();
        for _ in 0..10 {
            view.orbit(100.0, 0.0);
        }
        assert!((view.x_view_angle - 1000.0).abs() < 1e-4);
    }

    #[test]
    fn y_angle_never_leaves_range() {
        let mut view = ViewState::default();
        for dy in [30.0, 45.0, 80.0, -200.0, 15.0, -15.0, 89.0, 2.0] {
            view.orbit(0.0, dy);
            assert!((-90.0..=90.0).contains(&view.y_view_angle), "{view:?}");
        }
    }

    #[test]
    fn out_of_range_y_delta_keeps_previous_angle() {
        let mut view = ViewState {
            x_view_angle: 0.0,
            y_view_angle: 85.0,
        };
        view.orbit(0.0, 10.0);
        assert_eq!(view.y_view_angle, 85.0);
        view.orbit(0.0, 5.0);
        assert_eq!(view.y_view_angle, 90.0);
    }

    #[test]
    fn zero_view_matches_camera_orientation_only() {
        let camera = Camera::default();
        let view = ViewState::default();
        // Default camera has zero orientation angle, so the view is identity.
        assert!(view.view_matrix(&camera).abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn view_matrix_orbits_about_world_y() {
        let camera = Camera::default();
        let view = ViewState {
            x_view_angle: 90.0,
            y_view_angle: 0.0,
        };
        let out = view.view_matrix(&camera).transform_point3(glam::Vec3::X);
        assert!((out - glam::Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5, "{out:?}");
    }
}
