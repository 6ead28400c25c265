use diorama_common::Color;
use serde::{Deserialize, Serialize};

/// Largest supported bend angle, in degrees.
pub const MAX_BEND_ANGLE: f32 = 45.0;

/// User-facing bend configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendSettings {
    /// Distance from the camera where bending starts.
    pub bend_distance: f32,
    /// Distance over which the curve ramps up to `bend_angle`.
    pub curve_distance: f32,
    /// Bend angle in degrees, clamped to `[0, MAX_BEND_ANGLE]` when used.
    pub bend_angle: f32,
    pub enabled: bool,
    /// Geometry above this height is clipped and shows the cross-section.
    pub clip_height: f32,
    pub cross_section_color: Color,
    /// Padding added to the widened culling volume.
    pub extra_culling_space: f32,
}

impl Default for BendSettings {
    fn default() -> Self {
        Self {
            bend_distance: 20.0,
            curve_distance: 5.0,
            bend_angle: 30.0,
            enabled: true,
            clip_height: 10.0,
            cross_section_color: Color::BLACK,
            extra_culling_space: 10.0,
        }
    }
}

impl BendSettings {
    pub fn clamped_bend_angle(&self) -> f32 {
        self.bend_angle.clamp(0.0, MAX_BEND_ANGLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = BendSettings::default();
        assert_eq!(s.bend_distance, 20.0);
        assert_eq!(s.curve_distance, 5.0);
        assert_eq!(s.bend_angle, 30.0);
        assert!(s.enabled);
        assert_eq!(s.cross_section_color, Color::BLACK);
    }

    #[test]
    fn angle_is_clamped() {
        let s = BendSettings {
            bend_angle: 80.0,
            ..BendSettings::default()
        };
        assert_eq!(s.clamped_bend_angle(), 45.0);
        let s = BendSettings {
            bend_angle: -5.0,
            ..BendSettings::default()
        };
        assert_eq!(s.clamped_bend_angle(), 0.0);
    }
}
