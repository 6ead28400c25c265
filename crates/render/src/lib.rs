//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Components talk to the host renderer only through [`RenderBackend`].
//! - Every begun camera pass is ended, restoring the camera's culling state.
//!
//! [`RecordingBackend`] records commands instead of drawing; it backs the
//! CLI's text output and the tests. The wgpu backend lives in its own crate.

mod backend;
mod pass;
mod recording;

pub use backend::{RenderBackend, ShaderValue};
pub use pass::{PassHooks, PassScope};
pub use recording::{RecordingBackend, RenderCommand};

pub fn crate_info() -> &'static str {
    "diorama-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
