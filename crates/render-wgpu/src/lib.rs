//! wgpu render backend for the diorama.
//!
//! Draws instanced grass blades with the world-bend deformation into an
//! offscreen target. Driven entirely through [`diorama_render::RenderBackend`].
//!
//! # Invariants
//! - The backend never calls back into the components that drive it.
//! - Queued draws are consumed by exactly one [`GpuBackend::render`].
//! - Uniform names without a slot in the bend layout are ignored, not errors.

mod error;
mod gpu;
mod shaders;
mod uniforms;

pub use error::GpuError;
pub use gpu::{FrameStats, GpuBackend, covered_pixels};
