/// WGSL for the default (unlit) program: vertex color times an optional texture.
pub const DEFAULT_SHADER: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    eye: vec4<f32>,
};

struct Model {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
    color: vec4<f32>,
    flags: vec4<u32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var<uniform> model: Model;

@group(2) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(2) @binding(1)
var s_diffuse: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.projection * camera.view * model.model * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_diffuse, s_diffuse, in.uv);
    return select(model.color, texel * model.color, model.flags.x != 0u);
}
"#;

/// WGSL for the lit program: the default shading plus ambient, diffuse and
/// Blinn-Phong specular terms from one point light.
pub const LIT_SHADER: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    eye: vec4<f32>,
};

struct Model {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
    color: vec4<f32>,
    flags: vec4<u32>,
};

struct Light {
    position: vec4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var<uniform> model: Model;

@group(2) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(2) @binding(1)
var s_diffuse: sampler;

@group(3) @binding(0)
var<uniform> light: Light;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = model.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = camera.projection * camera.view * world;
    out.world_position = world.xyz;
    out.world_normal = (model.normal * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_diffuse, s_diffuse, in.uv);
    let base = select(model.color, texel * model.color, model.flags.x != 0u);

    let normal = normalize(in.world_normal);
    let to_light = normalize(light.position.xyz - in.world_position);
    let to_eye = normalize(camera.eye.xyz - in.world_position);
    let halfway = normalize(to_light + to_eye);

    let ambient = 0.15;
    let diffuse = max(dot(normal, to_light), 0.0);
    let specular = pow(max(dot(normal, halfway), 0.0), 32.0) * 0.5;

    let rgb = base.rgb * light.color.rgb * (ambient + diffuse) + light.color.rgb * specular;
    return vec4<f32>(rgb, base.a);
}
"#;
