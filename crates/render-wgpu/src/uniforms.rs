use bytemuck::{Pod, Zeroable};
use diorama_bend::uniforms;
use diorama_render::ShaderValue;
use glam::{Mat4, Vec4};

/// Per-frame camera data, bind group 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl FrameUniform {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// Per-material bend parameters, bind group 1.
///
/// Every field is a `vec4` so the struct matches WGSL uniform layout without
/// padding. Scalars are packed into `params` as
/// `(distance, curve_distance, bend_angle_degrees, enable_bend)` and
/// `clip` as `(clip_height, 0, 0, 0)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct BendUniform {
    pub camera_position: [f32; 4],
    pub camera_forward: [f32; 4],
    pub cross_section_color: [f32; 4],
    pub params: [f32; 4],
    pub clip: [f32; 4],
}

impl Default for BendUniform {
    /// Bending off and nothing clipped until the controller binds values.
    fn default() -> Self {
        Self {
            camera_position: [0.0; 4],
            camera_forward: [0.0, 0.0, -1.0, 0.0],
            cross_section_color: [0.0, 0.0, 0.0, 1.0],
            params: [0.0; 4],
            clip: [f32::MAX, 0.0, 0.0, 0.0],
        }
    }
}

impl BendUniform {
    /// Store a named value in its slot. Returns `false` for names this
    /// layout has no slot for.
    pub fn apply(&mut self, name: &str, value: ShaderValue) -> bool {
        let v = value_to_vec4(value);
        match name {
            uniforms::DISTANCE => self.params[0] = v.x,
            uniforms::CURVE_DISTANCE => self.params[1] = v.x,
            uniforms::BEND_ANGLE => self.params[2] = v.x,
            uniforms::ENABLE_BEND => self.params[3] = v.x,
            uniforms::CAMERA_POSITION => self.camera_position = v.to_array(),
            uniforms::CAMERA_FORWARD => self.camera_forward = v.to_array(),
            uniforms::CLIP_HEIGHT => self.clip[0] = v.x,
            uniforms::CROSS_SECTION_COLOR => self.cross_section_color = v.to_array(),
            _ => return false,
        }
        true
    }

    pub fn bend_enabled(&self) -> bool {
        self.params[3] > 0.5
    }
}

fn value_to_vec4(value: ShaderValue) -> Vec4 {
    match value {
        ShaderValue::Float(f) => Vec4::new(f, 0.0, 0.0, 0.0),
        ShaderValue::Vector(v) => v,
        ShaderValue::Color(c) => c.to_vec4(),
    }
}

/// One blade instance: the model matrix as four columns.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Mat4> for InstanceRaw {
    fn from(m: &Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}
