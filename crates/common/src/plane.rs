//! Ground-plane math. The world's vertical axis is +Y.

use glam::Vec3;

/// World up.
pub const UP: Vec3 = Vec3::Y;

/// Project a vector onto the horizontal ground plane (drop its vertical part).
pub fn project_on_ground(v: Vec3) -> Vec3 {
    v - UP * v.dot(UP)
}

/// Ground-projected, normalized direction of `v`.
///
/// Returns [`Vec3::ZERO`] when `v` is (nearly) vertical and has no ground
/// component to normalize.
pub fn ground_axis(v: Vec3) -> Vec3 {
    project_on_ground(v).normalize_or_zero()
}
