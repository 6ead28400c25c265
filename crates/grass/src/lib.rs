//! Grass: scatter blade instances over a surface mesh.
//!
//! # Invariants
//! - Every sampled point lies inside (or on the edge of) its source triangle.
//! - Initializing with `count = N` yields exactly `N` instances, or none for
//!   a mesh without triangles.
//! - The instance set is fixed after initialization; drawing never mutates it.

mod blade;
mod field;
mod mesh;
mod sampler;

pub use blade::BladeMesh;
pub use field::{GrassConfig, GrassField, scatter};
pub use mesh::{MeshError, SurfaceMesh, Triangle};
pub use sampler::{SurfaceSample, fold_into_triangle, sample_surface};
