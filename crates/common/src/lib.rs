//! Shared types and utilities for the diorama components.

pub mod plane;
pub mod types;

pub use plane::{UP, ground_axis, project_on_ground};
pub use types::{Color, MaterialId, MeshHandle, Transform};
