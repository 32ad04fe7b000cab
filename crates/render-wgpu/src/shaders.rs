/// WGSL shader for exhibit boxes.
///
/// `params.x` selects shading: 0 lit colour, 1 normal colour, 2 outline.
/// For outlines `params.y` is the border width in face units and `edge` the
/// border colour.
pub const BOX_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) edge: vec4<f32>,
    @location(8) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) local: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) edge: vec4<f32>,
    @location(4) params: vec4<f32>,
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
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.local = vertex.position;
    out.color = instance.color;
    out.edge = instance.edge;
    out.params = instance.params;
    return out;
}

fn lit(color: vec3<f32>, normal: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let diffuse = max(dot(normal, light_dir), 0.0);
    return color * (0.3 + diffuse * 0.7);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let mode = in.params.x;
    if (mode > 1.5) {
        // distance to the nearest edge of the face: 0.5 minus the middle |coordinate|
        let a = abs(in.local);
        let mid = a.x + a.y + a.z - max(a.x, max(a.y, a.z)) - min(a.x, min(a.y, a.z));
        let t = smoothstep(0.0, in.params.y, 0.5 - mid);
        let base = lit(in.color.rgb, in.world_normal);
        return vec4<f32>(mix(in.edge.rgb, base, t), 1.0);
    }
    if (mode > 0.5) {
        return vec4<f32>(in.world_normal * 0.5 + vec3<f32>(0.5), in.color.a);
    }
    return vec4<f32>(lit(in.color.rgb, in.world_normal), in.color.a);
}
"#;

/// WGSL shader for the grid floor.
pub const GRID_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct GridVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct GridOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_grid(vertex: GridVertex) -> GridOutput {
    var out: GridOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_grid(in: GridOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
