/// WGSL shader for scene objects: per-instance model matrix and material,
/// ambient plus per-light quadratic-attenuated diffuse and specular.
pub const SCENE_SHADER: &str = r#"
struct Light {
    position: vec4<f32>,
    color: vec4<f32>,
    attenuation: vec4<f32>,
};

struct Globals {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    light_count: vec4<u32>,
    lights: array<Light, 8>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) ambient: vec4<f32>,
    @location(7) diffuse: vec4<f32>,
    @location(8) specular_shininess: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) ambient: vec3<f32>,
    @location(3) diffuse: vec3<f32>,
    @location(4) specular_shininess: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = world_normal;
    out.ambient = instance.ambient.rgb;
    out.diffuse = instance.diffuse.rgb;
    out.specular_shininess = instance.specular_shininess;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.world_normal);
    let view_dir = normalize(globals.eye.xyz - in.world_pos);

    var color = in.ambient;
    for (var i = 0u; i < globals.light_count.x; i = i + 1u) {
        let light = globals.lights[i];
        let to_light = light.position.xyz - in.world_pos;
        let dist = length(to_light);
        let light_dir = to_light / max(dist, 1e-6);
        let atten = 1.0 / (1.0 + light.attenuation.x * dist * dist);

        let lambert = max(dot(normal, light_dir), 0.0);
        let reflect_dir = reflect(-light_dir, normal);
        let spec = pow(max(dot(reflect_dir, view_dir), 0.0), in.specular_shininess.w);

        color = color + atten * light.color.rgb *
            (in.diffuse * lambert + in.specular_shininess.rgb * spec);
    }
    return vec4<f32>(color, 1.0);
}
"#;
