use diorama_camera::CameraPose;
use glam::Mat4;

use crate::settings::BendSettings;

/// Culling matrix for `camera` widened to keep bent geometry visible.
///
/// Bending lifts (or drops) geometry beyond `bend_distance` by up to
/// `tan(angle) * (far - bend_distance)`; the orthographic volume is grown by
/// that height plus `extra_culling_space` both sideways and in depth.
pub fn expanded_culling_matrix(settings: &BendSettings, camera: &CameraPose) -> Mat4 {
    let max_bend_tan = settings.clamped_bend_angle().to_radians().tan();
    let max_bend_height = max_bend_tan * (camera.far - settings.bend_distance);
    let growth = max_bend_height + settings.extra_culling_space;

    let half_height = camera.ortho_half_height.max(camera.ortho_half_height + growth);
    let half_width = half_height * camera.aspect;
    let projection = Mat4::orthographic_rh(
        -half_width,
        half_width,
        -half_height,
        half_height,
        camera.near,
        camera.far + growth,
    );
    projection * camera.view_matrix()
}
