use std::collections::BTreeMap;
use std::fmt::Write as _;

use diorama_common::{MaterialId, MeshHandle};
use glam::Mat4;

use crate::backend::{RenderBackend, ShaderValue};

/// A command received by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    SetShaderValue {
        material: MaterialId,
        name: &'static str,
        value: ShaderValue,
    },
    DrawInstanced {
        mesh: MeshHandle,
        material: MaterialId,
        instance_count: usize,
    },
    SetCulling(Mat4),
    ResetCulling,
}

/// Backend that records commands instead of drawing.
///
/// Keeps the last bound value per material uniform so callers can inspect the
/// effective shader state, and produces a human-readable summary.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<RenderCommand>,
    bound: BTreeMap<(MaterialId, &'static str), ShaderValue>,
    culling: Option<Mat4>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drain recorded commands, keeping bound uniform state.
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Last value bound to `name` on `material`.
    pub fn shader_value(&self, material: MaterialId, name: &str) -> Option<ShaderValue> {
        self.bound
            .iter()
            .find(|((m, n), _)| *m == material && *n == name)
            .map(|(_, v)| *v)
    }

    /// Culling matrix currently overriding the camera default, if any.
    pub fn culling_override(&self) -> Option<Mat4> {
        self.culling
    }

    /// Total instances submitted across all recorded draws.
    pub fn instances_drawn(&self) -> usize {
        self.commands
            .iter()
            .map(|c| match c {
                RenderCommand::DrawInstanced { instance_count, .. } => *instance_count,
                _ => 0,
            })
            .sum()
    }

    /// Human-readable dump of bound uniforms and recorded commands.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Render State ({} commands) ===", self.commands.len());
        match self.culling {
            Some(m) => {
                let _ = writeln!(out, "Culling: override {:?}", m.to_cols_array());
            }
            None => out.push_str("Culling: camera default\n"),
        }
        for ((material, name), value) in &self.bound {
            let _ = writeln!(out, "  material {} {name} = {}", material.0, format_value(value));
        }
        for command in &self.commands {
            if let RenderCommand::DrawInstanced {
                mesh,
                material,
                instance_count,
            } = command
            {
                let _ = writeln!(
                    out,
                    "  draw mesh {} material {} x{instance_count}",
                    mesh.0, material.0
                );
            }
        }
        out
    }
}

fn format_value(value: &ShaderValue) -> String {
    match value {
        ShaderValue::Float(v) => format!("{v:.3}"),
        ShaderValue::Vector(v) => format!("({:.2}, {:.2}, {:.2}, {:.2})", v.x, v.y, v.z, v.w),
        ShaderValue::Color(c) => format!("rgba({:.2}, {:.2}, {:.2}, {:.2})", c.r, c.g, c.b, c.a),
    }
}

impl RenderBackend for RecordingBackend {
    fn set_shader_value(&mut self, material: MaterialId, name: &'static str, value: ShaderValue) {
        self.bound.insert((material, name), value);
        self.commands.push(RenderCommand::SetShaderValue {
            material,
            name,
            value,
        });
    }

    fn draw_instanced(&mut self, mesh: MeshHandle, material: MaterialId, instances: &[Mat4]) {
        tracing::trace!(mesh = mesh.0, count = instances.len(), "draw instanced");
        self.commands.push(RenderCommand::DrawInstanced {
            mesh,
            material,
            instance_count: instances.len(),
        });
    }

    fn set_culling_matrix(&mut self, matrix: Mat4) {
        self.culling = Some(matrix);
        self.commands.push(RenderCommand::SetCulling(matrix));
    }

    fn reset_culling_matrix(&mut self) {
        self.culling = None;
        self.commands.push(RenderCommand::ResetCulling);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_common::Color;
    use glam::Vec3;

    #[test]
    fn empty_backend_describes_default_state() {
        let backend = RecordingBackend::new();
        let output = backend.describe();
        assert!(output.contains("0 commands"));
        assert!(output.contains("camera default"));
    }

    #[test]
    fn last_bound_value_wins() {
        let mut backend = RecordingBackend::new();
        let m = MaterialId(3);
        backend.set_shader_value(m, "_Distance", ShaderValue::Float(1.0));
        backend.set_shader_value(m, "_Distance", ShaderValue::Float(2.0));
        assert_eq!(
            backend.shader_value(m, "_Distance"),
            Some(ShaderValue::Float(2.0))
        );
        assert_eq!(backend.commands().len(), 2);
    }

    #[test]
    fn describe_lists_uniforms_and_draws() {
        let mut backend = RecordingBackend::new();
        backend.set_shader_value(MaterialId(1), "_CrossSectionColor", Color::BLACK.into());
        backend.set_shader_value(MaterialId(1), "_BendCameraPos", Vec3::ONE.into());
        backend.draw_instanced(MeshHandle(7), MaterialId(1), &[Mat4::IDENTITY; 3]);

        let output = backend.describe();
        assert!(output.contains("_CrossSectionColor = rgba(0.00, 0.00, 0.00, 1.00)"));
        assert!(output.contains("draw mesh 7 material 1 x3"));
        assert_eq!(backend.instances_drawn(), 3);
    }

    #[test]
    fn bool_binds_as_float_flag() {
        assert_eq!(ShaderValue::from(true), ShaderValue::Float(1.0));
        assert_eq!(ShaderValue::from(false), ShaderValue::Float(0.0));
    }
}
