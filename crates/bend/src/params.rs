use diorama_camera::CameraPose;
use diorama_common::{Color, MaterialId};
use diorama_render::RenderBackend;
use glam::Vec3;

use crate::settings::BendSettings;

/// Uniform names the bend shaders read.
pub mod uniforms {
    pub const DISTANCE: &str = "_Distance";
    pub const CURVE_DISTANCE: &str = "_CurveDistance";
    pub const BEND_ANGLE: &str = "_BendAngle";
    pub const ENABLE_BEND: &str = "_EnableBend";
    pub const CAMERA_POSITION: &str = "_BendCameraPos";
    pub const CAMERA_FORWARD: &str = "_BendCameraForward";
    pub const CLIP_HEIGHT: &str = "_ClipHeight";
    pub const CROSS_SECTION_COLOR: &str = "_CrossSectionColor";
}

/// Shader parameters for one frame of the bend effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendParams {
    pub distance: f32,
    pub curve_distance: f32,
    /// Degrees, already clamped.
    pub bend_angle: f32,
    pub enable_bend: bool,
    pub camera_position: Vec3,
    pub camera_forward: Vec3,
    pub clip_height: f32,
    pub cross_section_color: Color,
}

impl BendParams {
    pub fn new(settings: &BendSettings, camera: &CameraPose) -> Self {
        Self {
            distance: settings.bend_distance,
            curve_distance: settings.curve_distance,
            bend_angle: settings.clamped_bend_angle(),
            enable_bend: settings.enabled,
            camera_position: camera.position,
            camera_forward: camera.forward(),
            clip_height: settings.clip_height,
            cross_section_color: settings.cross_section_color,
        }
    }

    /// Write every parameter to `material` as named uniforms.
    pub fn bind(&self, material: MaterialId, backend: &mut dyn RenderBackend) {
        backend.set_shader_value(material, uniforms::DISTANCE, self.distance.into());
        backend.set_shader_value(material, uniforms::CURVE_DISTANCE, self.curve_distance.into());
        backend.set_shader_value(material, uniforms::BEND_ANGLE, self.bend_angle.into());
        backend.set_shader_value(material, uniforms::ENABLE_BEND, self.enable_bend.into());
        backend.set_shader_value(material, uniforms::CAMERA_POSITION, self.camera_position.into());
        backend.set_shader_value(material, uniforms::CAMERA_FORWARD, self.camera_forward.into());
        backend.set_shader_value(material, uniforms::CLIP_HEIGHT, self.clip_height.into());
        backend.set_shader_value(
            material,
            uniforms::CROSS_SECTION_COLOR,
            self.cross_section_color.into(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_render::{RecordingBackend, ShaderValue};

    #[test]
    fn params_follow_settings_and_camera() {
        let settings = BendSettings {
            bend_angle: 60.0,
            enabled: false,
            ..BendSettings::default()
        };
        let camera = CameraPose::default();
        let params = BendParams::new(&settings, &camera);
        assert_eq!(params.bend_angle, 45.0);
        assert!(!params.enable_bend);
        assert_eq!(params.camera_position, camera.position);
        assert_eq!(params.camera_forward, camera.forward());
    }

    #[test]
    fn bind_writes_all_uniforms() {
        let params = BendParams::new(&BendSettings::default(), &CameraPose::default());
        let mut backend = RecordingBackend::new();
        let m = MaterialId(2);
        params.bind(m, &mut backend);

        assert_eq!(backend.commands().len(), 8);
        assert_eq!(
            backend.shader_value(m, uniforms::DISTANCE),
            Some(ShaderValue::Float(20.0))
        );
        assert_eq!(
            backend.shader_value(m, uniforms::ENABLE_BEND),
            Some(ShaderValue::Float(1.0))
        );
        assert_eq!(
            backend.shader_value(m, uniforms::CAMERA_POSITION),
            Some(ShaderValue::Vector(CameraPose::default().position.extend(0.0)))
        );
        assert_eq!(
            backend.shader_value(m, uniforms::CROSS_SECTION_COLOR),
            Some(ShaderValue::Color(Color::BLACK))
        );
    }
}
