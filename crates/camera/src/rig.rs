use diorama_input::{Action, InputSource, RotateDirection};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::CameraError;
use crate::pose::CameraPose;
use crate::rotation::RotationAnimator;
use crate::snap::PixelSnapper;

/// Tunables for [`CameraRig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Units per second along the ground-projected forward axis.
    pub forward_speed: f32,
    /// Units per second along the ground-projected right axis.
    pub strafe_speed: f32,
    /// Ease-in part of a rotation step, in seconds.
    pub acceleration_time: f32,
    /// Ease-out part of a rotation step, in seconds.
    pub deceleration_time: f32,
    /// Yaw change of one rotation step, in degrees.
    pub rotation_step_degrees: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            forward_speed: 5.0,
            strafe_speed: 5.0,
            acceleration_time: 0.5,
            deceleration_time: 0.3,
            rotation_step_degrees: 45.0,
        }
    }
}

impl RigConfig {
    /// Total duration of one rotation step.
    pub fn rotation_duration(&self) -> f32 {
        self.acceleration_time + self.deceleration_time
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        let duration = self.rotation_duration();
        if duration <= 0.0 {
            return Err(CameraError::InvalidRotationDuration(duration));
        }
        Ok(())
    }
}

/// One tick's worth of rig input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub rotate: Option<RotateDirection>,
}

impl RigInput {
    /// Read held movement and pressed rotation actions from `source`.
    /// Left wins if both rotations are pressed on the same frame.
    pub fn poll(source: &impl InputSource) -> Self {
        let rotate = if source.was_pressed(Action::RotateLeft) {
            Some(RotateDirection::Left)
        } else if source.was_pressed(Action::RotateRight) {
            Some(RotateDirection::Right)
        } else {
            None
        };
        Self {
            forward: source.is_held(Action::MoveForward),
            back: source.is_held(Action::MoveBack),
            left: source.is_held(Action::MoveLeft),
            right: source.is_held(Action::MoveRight),
            rotate,
        }
    }
}

/// Camera controller: accumulates an intended position from directional
/// input, applies its pixel-snapped counterpart, and steps yaw in eased
/// fixed-angle rotations.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: RigConfig,
    pose: CameraPose,
    intended: Vec3,
    snapper: PixelSnapper,
    rotation: RotationAnimator,
}

impl CameraRig {
    pub fn new(config: RigConfig, pose: CameraPose) -> Result<Self, CameraError> {
        config.validate()?;
        pose.validate()?;
        Ok(Self {
            config,
            pose,
            intended: pose.position,
            snapper: PixelSnapper::from_pose(&pose),
            rotation: RotationAnimator::new(config.rotation_duration()),
        })
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Pose currently applied to the camera.
    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    /// Unsnapped position the rig is moving toward.
    pub fn intended_position(&self) -> Vec3 {
        self.intended
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_animating()
    }

    pub fn rotation_target(&self) -> Option<f32> {
        self.rotation.target()
    }

    /// Move the camera without animation and re-anchor snapping there.
    pub fn teleport(&mut self, position: Vec3) {
        self.pose.position = position;
        self.intended = position;
        self.snapper.reset(position);
    }

    /// Poll `source` and advance one tick.
    pub fn tick_with(&mut self, source: &impl InputSource, dt: f32) {
        self.tick(&RigInput::poll(source), dt);
    }

    /// Advance one tick of `dt` seconds. Translation and rotation are
    /// handled independently.
    pub fn tick(&mut self, input: &RigInput, dt: f32) {
        let _span = tracing::info_span!("rig_tick").entered();
        self.apply_movement(input, dt);
        self.apply_rotation(input, dt);
    }

    fn apply_movement(&mut self, input: &RigInput, dt: f32) {
        let forward = self.pose.ground_forward();
        let right = self.pose.ground_right();

        let mut direction = Vec3::ZERO;
        if input.forward {
            direction += forward;
        }
        if input.back {
            direction -= forward;
        }
        if input.left {
            direction -= right;
        }
        if input.right {
            direction += right;
        }
        if direction == Vec3::ZERO {
            return;
        }

        let forward_component = direction.dot(forward);
        let right_component = direction.dot(right);
        self.intended += forward * forward_component * self.config.forward_speed * dt;
        self.intended += right * right_component * self.config.strafe_speed * dt;
        self.intended.y = self.pose.position.y;

        self.pose.position = self.snapper.snap(self.intended, forward, right);
        tracing::trace!(
            intended = ?self.intended,
            snapped = ?self.pose.position,
            "camera moved"
        );
    }

    fn apply_rotation(&mut self, input: &RigInput, dt: f32) {
        if self.rotation.is_animating() {
            if input.rotate.is_some() {
                tracing::trace!("rotation in flight, dropping rotate command");
            }
            if let Some(yaw) = self.rotation.advance(dt) {
                self.pose.yaw_degrees = yaw;
            }
            if !self.rotation.is_animating() {
                tracing::debug!(yaw = self.pose.yaw_degrees, "rotation finished");
            }
            return;
        }

        if let Some(direction) = input.rotate {
            let delta = direction.sign() * self.config.rotation_step_degrees;
            self.rotation.start(self.pose.yaw_degrees, delta);
            tracing::debug!(from = self.pose.yaw_degrees, delta, "rotation started");
        }
    }
}
