//! Camera rig: pixel-snapped movement and stepped yaw rotation for an
//! orthographic, obliquely tilted camera.
//!
//! # Invariants
//! - The applied camera position is always a pixel-snapped position.
//! - A rotation, once started, always lands exactly on its target yaw.
//! - Units-per-pixel is derived once from the pose and never changes.

mod easing;
mod error;
mod pose;
mod rig;
mod rotation;
mod snap;

pub use easing::ease_in_out_quad;
pub use error::CameraError;
pub use pose::CameraPose;
pub use rig::{CameraRig, RigConfig, RigInput};
pub use rotation::{RotationAnimator, RotationState};
pub use snap::{FORWARD_STEP_FACTOR, PixelSnapper};
