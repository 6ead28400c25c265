/// WGSL shader for instanced grass blades with the world-bend deformation.
///
/// Geometry further than `distance` along the camera's ground-projected
/// forward axis is pulled down; the angle ramps from zero to `bend_angle`
/// over `curve_distance`. Fragments above `clip_height` are discarded and
/// back faces show the cross-section color.
pub const GRASS_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
};

struct Bend {
    camera_position: vec4<f32>,
    camera_forward: vec4<f32>,
    cross_section_color: vec4<f32>,
    // distance, curve_distance, bend_angle (degrees), enable_bend
    params: vec4<f32>,
    // clip_height, unused x3
    clip: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var<uniform> bend: Bend;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) world_y: f32,
};

fn bend_offset(world: vec3<f32>) -> f32 {
    if (bend.params.w < 0.5) {
        return 0.0;
    }
    let flat_forward = vec3<f32>(bend.camera_forward.x, 0.0, bend.camera_forward.z);
    if (dot(flat_forward, flat_forward) < 1e-8) {
        return 0.0;
    }
    let along = dot(world - bend.camera_position.xyz, normalize(flat_forward));
    let past = max(along - bend.params.x, 0.0);
    let ramp = clamp(past / max(bend.params.y, 1e-4), 0.0, 1.0);
    let angle = radians(bend.params.z) * ramp;
    return past * tan(angle);
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var world = (model * vec4<f32>(vertex.position, 1.0)).xyz;
    world.y = world.y - bend_offset(world);

    var out: VertexOutput;
    out.clip_position = frame.view_proj * vec4<f32>(world, 1.0);
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.uv = vertex.uv;
    out.world_y = world.y;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    if (in.world_y > bend.clip.x) {
        discard;
    }
    if (!front) {
        return bend.cross_section_color;
    }
    let root = vec3<f32>(0.10, 0.30, 0.08);
    let tip = vec3<f32>(0.45, 0.75, 0.25);
    let base = mix(root, tip, in.uv.y);
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let diffuse = abs(dot(in.world_normal, light_dir));
    return vec4<f32>(base * (0.4 + diffuse * 0.6), 1.0);
}
"#;
