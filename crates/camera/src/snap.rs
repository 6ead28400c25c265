use diorama_common::{ground_axis, project_on_ground};
use glam::Vec3;

use crate::pose::CameraPose;

/// Forward steps are this many pixels long.
///
/// The camera looks down at an angle, so one pixel of screen height covers
/// roughly two units of ground travel along the forward axis.
pub const FORWARD_STEP_FACTOR: f32 = 2.0;

/// Quantizes continuous camera movement to whole-pixel steps along the
/// camera's ground-projected forward and right axes.
///
/// Snapping is incremental: every result becomes the reference point for the
/// next call, so sub-pixel movement left over in the intended position keeps
/// accumulating until it crosses a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSnapper {
    units_per_pixel: f32,
    previous: Vec3,
}

impl PixelSnapper {
    pub fn new(units_per_pixel: f32, origin: Vec3) -> Self {
        debug_assert!(units_per_pixel > 0.0, "units per pixel must be positive");
        Self {
            units_per_pixel,
            previous: origin,
        }
    }

    /// Snapper anchored at the pose's position with its pixel size.
    pub fn from_pose(pose: &CameraPose) -> Self {
        Self::new(pose.units_per_pixel(), pose.position)
    }

    pub fn units_per_pixel(&self) -> f32 {
        self.units_per_pixel
    }

    /// Last snapped position.
    pub fn previous(&self) -> Vec3 {
        self.previous
    }

    /// Re-anchor, e.g. after teleporting the camera.
    pub fn reset(&mut self, origin: Vec3) {
        self.previous = origin;
    }

    /// Snap `intended` relative to the previous snapped position.
    ///
    /// `forward` and `right` are projected onto the ground and normalized
    /// here; an axis with no ground component contributes no movement. The
    /// vertical coordinate of the previous position is kept.
    pub fn snap(&mut self, intended: Vec3, forward: Vec3, right: Vec3) -> Vec3 {
        let offset = project_on_ground(intended - self.previous);
        let forward = ground_axis(forward);
        let right = ground_axis(right);

        let forward_offset = quantize(
            offset.dot(forward),
            self.units_per_pixel * FORWARD_STEP_FACTOR,
        );
        let right_offset = quantize(offset.dot(right), self.units_per_pixel);

        let mut snapped = self.previous + forward * forward_offset + right * right_offset;
        snapped.y = self.previous.y;

        self.previous = snapped;
        snapped
    }
}

/// Round `value` to the nearest multiple of `step` (ties to even).
fn quantize(value: f32, step: f32) -> f32 {
    (value / step).round_ties_even() * step
}
