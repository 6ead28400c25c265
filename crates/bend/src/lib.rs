//! World bending: the screen-space effect that curves distant geometry down
//! (or up) away from the camera.
//!
//! # Invariants
//! - Shader state is pushed only through the typed [`BendParams`].
//! - Every begin-pass culling override is undone by the matching end-pass,
//!   including frames where bending is switched off.
//! - Material discovery goes through an injected [`MaterialSource`].

mod culling;
mod manager;
mod params;
mod settings;
mod source;

pub use culling::expanded_culling_matrix;
pub use manager::BendingManager;
pub use params::{BendParams, uniforms};
pub use settings::{BendSettings, MAX_BEND_ANGLE};
pub use source::{
    DirectoryMaterialSource, Material, MaterialSource, SourceError, StaticMaterialSource,
};

pub fn crate_info() -> &'static str {
    "diorama-bend v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("bend"));
    }
}
