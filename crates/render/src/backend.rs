use diorama_common::{Color, MaterialId, MeshHandle};
use glam::{Mat4, Vec3, Vec4};

/// A loosely typed shader uniform value, as the host renderer accepts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShaderValue {
    Float(f32),
    Vector(Vec4),
    Color(Color),
}

impl From<f32> for ShaderValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ShaderValue {
    fn from(v: bool) -> Self {
        Self::Float(if v { 1.0 } else { 0.0 })
    }
}

impl From<Vec3> for ShaderValue {
    fn from(v: Vec3) -> Self {
        Self::Vector(v.extend(0.0))
    }
}

impl From<Color> for ShaderValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

/// Services the host renderer provides to the components.
///
/// Implementations never call back into the components; they only take
/// parameters and draw requests.
pub trait RenderBackend {
    /// Bind a named uniform on `material`.
    fn set_shader_value(&mut self, material: MaterialId, name: &'static str, value: ShaderValue);

    /// Submit one instanced draw of `mesh` with `material`, one instance per
    /// model matrix.
    fn draw_instanced(&mut self, mesh: MeshHandle, material: MaterialId, instances: &[Mat4]);

    /// Override the active camera's culling matrix.
    fn set_culling_matrix(&mut self, matrix: Mat4);

    /// Restore the active camera's default culling matrix.
    fn reset_culling_matrix(&mut self);
}
