/// Errors from invalid camera or rig configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CameraError {
    #[error("screen height must be positive, got {0}")]
    InvalidScreenHeight(f32),
    #[error("orthographic half-height must be positive, got {0}")]
    InvalidOrthoSize(f32),
    #[error("far plane ({far}) must lie beyond near plane ({near})")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("rotation duration must be positive, got {0}")]
    InvalidRotationDuration(f32),
}
