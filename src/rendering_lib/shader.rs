// src/rendering_lib/shader.rs

pub const MAX_POINT_LIGHTS: usize = 4;

pub const WGSL_SHADER_SOURCE: &str = r#"
struct FrameUniform {
    view_proj: mat4x4<f32>,
    view_pos: vec4<f32>,
    light_color: vec4<f32>,
    // constant, linear, quadratic, light count
    attenuation: vec4<f32>,
    lights: array<vec4<f32>, 4>,
}

struct InstanceUniform {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    // xyz: light carried by a lamp body
    own_light: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> instance: InstanceUniform;

@group(2) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(2) @binding(1)
var s_diffuse: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) tex_coords: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) tex_coords: vec2<f32>,
}

@vertex
fn vs_main(model: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = instance.model * vec4<f32>(model.position, 1.0);
    out.world_position = world.xyz;
    out.world_normal = (instance.normal_matrix * vec4<f32>(model.normal, 0.0)).xyz;
    out.tex_coords = model.tex_coords;
    out.clip_position = frame.view_proj * world;
    return out;
}

fn point_light(light_pos: vec3<f32>, world_pos: vec3<f32>, normal: vec3<f32>, view_dir: vec3<f32>, base: vec3<f32>) -> vec3<f32> {
    let to_light = light_pos - world_pos;
    let distance = length(to_light);
    let light_dir = to_light / max(distance, 0.0001);

    let diffuse = max(dot(normal, light_dir), 0.0);
    let halfway = normalize(light_dir + view_dir);
    let specular = pow(max(dot(normal, halfway), 0.0), 32.0);

    let attenuation = 1.0 / (frame.attenuation.x
        + frame.attenuation.y * distance
        + frame.attenuation.z * distance * distance);

    return (diffuse * base + 0.3 * specular) * frame.light_color.rgb * attenuation;
}

@fragment
fn fs_lit(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_diffuse, s_diffuse, in.tex_coords);
    if (texel.a < 0.1) {
        discard;
    }
    let normal = normalize(in.world_normal);
    let view_dir = normalize(frame.view_pos.xyz - in.world_position);

    var color = 0.05 * texel.rgb;
    let count = u32(frame.attenuation.w);
    for (var i = 0u; i < count; i = i + 1u) {
        color += point_light(frame.lights[i].xyz, in.world_position, normal, view_dir, texel.rgb);
    }
    return vec4<f32>(color, texel.a);
}

@fragment
fn fs_lamp(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_diffuse, s_diffuse, in.tex_coords);
    let normal = normalize(in.world_normal);
    let view_dir = normalize(frame.view_pos.xyz - in.world_position);

    let glow = 0.6 * texel.rgb * frame.light_color.rgb;
    let lit = point_light(instance.own_light.xyz, in.world_position, normal, view_dir, texel.rgb);
    return vec4<f32>(glow + lit, texel.a);
}
"#;
