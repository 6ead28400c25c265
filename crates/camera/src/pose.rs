use diorama_common::ground_axis;
use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Orthographic camera pose: placement, orientation and projection.
///
/// Orientation is yaw about world +Y followed by pitch about the local X
/// axis. At zero yaw and pitch the camera looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    /// Half the vertical extent of the view volume, in world units.
    pub ortho_half_height: f32,
    /// Height of the render target in pixels.
    pub screen_height_px: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 10.0),
            yaw_degrees: 0.0,
            pitch_degrees: -30.0,
            ortho_half_height: 5.0,
            screen_height_px: 360.0,
            aspect: 16.0 / 9.0,
            near: 0.3,
            far: 100.0,
        }
    }
}

impl CameraPose {
    pub fn validate(&self) -> Result<(), CameraError> {
        if self.screen_height_px <= 0.0 {
            return Err(CameraError::InvalidScreenHeight(self.screen_height_px));
        }
        if self.ortho_half_height <= 0.0 {
            return Err(CameraError::InvalidOrthoSize(self.ortho_half_height));
        }
        if self.far <= self.near {
            return Err(CameraError::InvalidClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        Ok(())
    }

    /// World units covered by one screen pixel.
    pub fn units_per_pixel(&self) -> f32 {
        2.0 * self.ortho_half_height / self.screen_height_px
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw_degrees.to_radians(),
            self.pitch_degrees.to_radians(),
            0.0,
        )
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// Forward projected onto the ground plane and normalized.
    pub fn ground_forward(&self) -> Vec3 {
        ground_axis(self.forward())
    }

    /// Right projected onto the ground plane and normalized.
    pub fn ground_right(&self) -> Vec3 {
        ground_axis(self.right())
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let h = self.ortho_half_height;
        let w = h * self.aspect;
        Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_pose_is_valid_and_looks_down() {
        let pose = CameraPose::default();
        assert!(pose.validate().is_ok());
        assert!(pose.forward().y < 0.0);
        let vp = pose.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn units_per_pixel_from_ortho_and_screen() {
        let pose = CameraPose {
            ortho_half_height: 5.0,
            screen_height_px: 200.0,
            ..CameraPose::default()
        };
        assert!((pose.units_per_pixel() - 0.05).abs() < EPS);
    }

    #[test]
    fn ground_axes_are_orthonormal_and_flat() {
        let pose = CameraPose {
            yaw_degrees: 30.0,
            ..CameraPose::default()
        };
        let f = pose.ground_forward();
        let r = pose.ground_right();
        assert!(f.y.abs() < EPS && r.y.abs() < EPS);
        assert!((f.length() - 1.0).abs() < EPS);
        assert!((r.length() - 1.0).abs() < EPS);
        assert!(f.dot(r).abs() < EPS);
    }

    #[test]
    fn positive_yaw_turns_left() {
        let pose = CameraPose {
            yaw_degrees: 90.0,
            pitch_degrees: 0.0,
            ..CameraPose::default()
        };
        assert!((pose.forward() - Vec3::NEG_X).length() < EPS);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let pose = CameraPose {
            screen_height_px: 0.0,
            ..CameraPose::default()
        };
        assert_eq!(pose.validate(), Err(CameraError::InvalidScreenHeight(0.0)));

        let pose = CameraPose {
            near: 10.0,
            far: 1.0,
            ..CameraPose::default()
        };
        assert!(matches!(
            pose.validate(),
            Err(CameraError::InvalidClipPlanes { .. })
        ));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let pose: CameraPose = serde_yaml::from_str("yaw_degrees: 45.0\n").unwrap();
        assert_eq!(pose.yaw_degrees, 45.0);
        assert_eq!(pose.pitch_degrees, -30.0);
    }
}
