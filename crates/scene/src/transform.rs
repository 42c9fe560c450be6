use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One translate-rotate-scale triple in an object's transform stack.
///
/// A step contributes `Translate(t) * Rotate(angle, axis) * Scale(s)` to the
/// object's model matrix, in that order. Steps later in an object's sequence
/// compose to the right, so a second step nests inside the first (the classic
/// fixed-pipeline push/translate/rotate/scale chain as an explicit value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformStep {
    pub translation: Vec3,
    pub rotation_axis: Vec3,
    /// Rotation angle in degrees, matching the fixed-pipeline convention.
    pub rotation_angle_deg: f32,
    pub scale: Vec3,
}

impl Default for TransformStep {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_axis: Vec3::Z,
            rotation_angle_deg: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl TransformStep {
    /// The step's matrix: `T * R * S`.
    ///
    /// A zero-length rotation axis is treated as no rotation rather than a
    /// NaN quaternion; the fixed pipeline is equally forgiving.
    pub fn matrix(&self) -> Mat4 {
        let rotation = if self.rotation_axis.length_squared() > 0.0 {
            Quat::from_axis_angle(
                self.rotation_axis.normalize(),
                self.rotation_angle_deg.to_radians(),
            )
        } else {
            Quat::IDENTITY
        };
        Mat4::from_translation(self.translation)
            * Mat4::from_quat(rotation)
            * Mat4::from_scale(self.scale)
    }
}
