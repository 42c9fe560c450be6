use crate::mesh::{TriMesh, cube_mesh};
use crate::transform::TransformStep;
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// A point light source with quadratic distance attenuation.
///
/// Position is homogeneous: `w == 1` is a point light, `w == 0` would denote
/// a directional light. This system only ever builds point lights, but the
/// representation keeps the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec4,
    pub color: Vec3,
    pub attenuation: f32,
}

impl PointLight {
    pub fn new(position: Vec4, color: Vec3, attenuation: f32) -> Self {
        Self {
            position,
            color,
            attenuation,
        }
    }
}

/// Phong material: reflectance triples plus a shininess exponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.6),
            specular: Vec3::ONE,
            shininess: 5.0,
        }
    }
}

/// A drawable object: triangle mesh, material, and an ordered stack of
/// transform steps applied before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub mesh: TriMesh,
    pub material: Material,
    pub transform_steps: Vec<TransformStep>,
}

impl SceneObject {
    pub fn new(mesh: TriMesh, material: Material) -> Self {
        Self {
            mesh,
            material,
            transform_steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<TransformStep>) -> Self {
        self.transform_steps = steps;
        self
    }

    /// Compose the model matrix from the transform steps, left to right.
    ///
    /// The first step's matrix sits leftmost in the product, so it is applied
    /// last to object-space vertices; later steps nest inside earlier ones.
    /// An empty step list yields the identity.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform_steps
            .iter()
            .fold(Mat4::IDENTITY, |acc, step| acc * step.matrix())
    }
}

/// The full scene: light list and drawable object list.
///
/// Lights are immutable after construction. Objects are mutated in place by
/// the input mapper (e.g. a marker pose driving one object's steps) and are
/// addressed by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    lights: Vec<PointLight>,
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(lights: Vec<PointLight>, objects: Vec<SceneObject>) -> Self {
        Self { lights, objects }
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Mutable access by index. Out-of-range is a quiet `None`; the caller
    /// treats a missing object as a no-op.
    pub fn object_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(index)
    }
}

/// The standalone demo scene: two cubes and three colored point lights.
pub fn demo_scene() -> Scene {
    let lights = vec![
        PointLight::new(Vec4::new(-0.8, 0.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 0.0), 0.2),
        PointLight::new(
            Vec4::new(0.15, 0.85, 0.7, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            0.1,
        ),
        PointLight::new(
            Vec4::new(0.5, -0.5, 0.85, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            0.0,
        ),
    ];

    let cube = cube_mesh();

    let cube1 = SceneObject::new(cube.clone(), Material::default()).with_steps(vec![
        TransformStep {
            translation: Vec3::new(-0.6, 0.0, 0.0),
            rotation_axis: Vec3::new(1.0, 1.0, 0.0),
            rotation_angle_deg: 60.0,
            scale: Vec3::splat(0.5),
        },
    ]);

    // Cube 2 nests a second, smaller step inside its placement step.
    let cube2 = SceneObject::new(cube, Material::default()).with_steps(vec![
        TransformStep {
            translation: Vec3::new(2.0, 0.0, 0.0),
            rotation_axis: Vec3::Y,
            rotation_angle_deg: 135.0,
            scale: Vec3::splat(1.5),
        },
        TransformStep {
            translation: Vec3::ZERO,
            rotation_axis: Vec3::X,
            rotation_angle_deg: 0.0,
            scale: Vec3::splat(0.5),
        },
    ]);

    Scene::new(lights, vec![cube1, cube2])
}

/// The marker-driven scene variant: same two cubes with neutral transforms
/// (object 1 carries the translation step and rotation step the pose mapper
/// writes into) and plain white, unattenuated lights.
pub fn marker_scene() -> Scene {
    let white = Vec3::ONE;
    let lights = vec![
        PointLight::new(Vec4::new(-0.8, 0.0, 1.0, 1.0), white, 0.0),
        PointLight::new(Vec4::new(0.15, 0.85, 0.7, -40.0), white, 0.0),
        PointLight::new(Vec4::new(0.5, -0.5, 0.85, 1.0), white, 0.0),
    ];

    let cube = cube_mesh();

    let cube1 = SceneObject::new(cube.clone(), Material::default()).with_steps(vec![
        TransformStep {
            rotation_axis: Vec3::new(1.0, 1.0, 0.0),
            scale: Vec3::splat(0.5),
            ..Default::default()
        },
    ]);

    let cube2 = SceneObject::new(cube, Material::default()).with_steps(vec![
        TransformStep {
            rotation_axis: Vec3::Y,
            ..Default::default()
        },
        TransformStep {
            rotation_axis: Vec3::X,
            ..Default::default()
        },
    ]);

    Scene::new(lights, vec![cube1, cube2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_steps_compose_to_identity() {
        let obj = SceneObject::new(cube_mesh(), Material::default());
        assert!(obj.model_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn step_order_is_not_commutative() {
        let translate = TransformStep {
            translation: Vec3::new(1.0, 0.0, 0.0),
            ..Default::default()
        };
        let scale = TransformStep {
            scale: Vec3::splat(2.0),
            ..Default::default()
        };

        let mesh = cube_mesh();
        let t_then_s = SceneObject::new(mesh.clone(), Material::default())
            .with_steps(vec![translate, scale]);
        let s_then_t =
            SceneObject::new(mesh, Material::default()).with_steps(vec![scale, translate]);

        let p = Vec3::X;
        let a = t_then_s.model_matrix().transform_point3(p);
        let b = s_then_t.model_matrix().transform_point3(p);
        // translate-then-scale: (1,0,0) -> scaled (2,0,0) -> shifted (3,0,0)
        // scale-then-translate: (1,0,0) -> shifted (2,0,0) -> scaled (4,0,0)
        assert!((a - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5, "{a:?}");
        assert!((b - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-5, "{b:?}");
        assert!((a - b).length() > 0.5);
    }

    #[test]
    fn demo_scene_layout() {
        let scene = demo_scene();
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.objects()[0].transform_steps.len(), 1);
        assert_eq!(scene.objects()[1].transform_steps.len(), 2);
        // All lights are point lights
        for light in scene.lights() {
            assert_eq!(light.position.w, 1.0);
        }
    }

    #[test]
    fn marker_scene_has_pose_slots() {
        let scene = marker_scene();
        // The pose mapper writes translation into step 0 and rotation into
        // step 1 of object 1.
        assert!(scene.objects()[1].transform_steps.len() >= 2);
    }

    #[test]
    fn object_mut_out_of_range_is_none() {
        let mut scene = demo_scene();
        assert!(scene.object_mut(2).is_none());
        assert!(scene.object_mut(1).is_some());
    }
}
