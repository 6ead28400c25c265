use diorama_camera::CameraPose;
use diorama_common::MaterialId;
use diorama_render::{PassHooks, RenderBackend};

use crate::culling::expanded_culling_matrix;
use crate::params::{BendParams, uniforms};
use crate::settings::BendSettings;
use crate::source::{Material, MaterialSource};

/// Drives the bend effect: keeps the bend materials' shader parameters in
/// sync with the settings and camera, and widens the camera's culling volume
/// for the duration of each render pass.
///
/// Pass hooks act only between [`enable`](Self::enable) and
/// [`disable`](Self::disable).
pub struct BendingManager {
    settings: BendSettings,
    camera: Option<CameraPose>,
    materials: Vec<Material>,
    source: Box<dyn MaterialSource>,
    subscribed: bool,
}

impl BendingManager {
    pub fn new(settings: BendSettings, source: Box<dyn MaterialSource>) -> Self {
        Self {
            settings,
            camera: None,
            materials: Vec::new(),
            source,
            subscribed: false,
        }
    }

    pub fn settings(&self) -> &BendSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut BendSettings {
        &mut self.settings
    }

    pub fn camera(&self) -> Option<&CameraPose> {
        self.camera.as_ref()
    }

    /// Assign (or clear) the camera the effect bends around.
    ///
    /// The manager keeps its own copy of the pose; a moving camera must be
    /// refreshed every tick, usually through [`sync_camera`](Self::sync_camera).
    pub fn set_camera(&mut self, camera: Option<CameraPose>) {
        self.camera = camera;
    }

    /// Per-tick entry point: take the camera's current pose and push
    /// parameters built from it.
    pub fn sync_camera(&mut self, camera: &CameraPose, backend: &mut dyn RenderBackend) {
        self.camera = Some(*camera);
        self.update(backend);
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Subscribe the pass hooks, load materials and push parameters.
    pub fn enable(&mut self, backend: &mut dyn RenderBackend) {
        self.subscribed = true;
        self.load_materials();
        self.update(backend);
    }

    /// Unsubscribe the pass hooks and switch the effect off on every material.
    pub fn disable(&mut self, backend: &mut dyn RenderBackend) {
        self.subscribed = false;
        for material in &self.materials {
            backend.set_shader_value(material.id, uniforms::ENABLE_BEND, false.into());
        }
    }

    /// Push current parameters to every material. Skipped, with a warning,
    /// while no camera is assigned.
    pub fn update(&mut self, backend: &mut dyn RenderBackend) {
        let Some(camera) = self.camera.as_ref() else {
            tracing::warn!("bend camera is not assigned, skipping parameter update");
            return;
        };
        let params = BendParams::new(&self.settings, camera);
        for material in &self.materials {
            params.bind(material.id, backend);
        }
    }

    /// Replace the material list from the source and push parameters.
    pub fn reload_materials(&mut self, backend: &mut dyn RenderBackend) {
        self.load_materials();
        self.update(backend);
    }

    /// Add a material unless one with the same id is already present.
    pub fn add_material(&mut self, material: Material, backend: &mut dyn RenderBackend) -> bool {
        if self.materials.iter().any(|m| m.id == material.id) {
            return false;
        }
        self.materials.push(material);
        self.update(backend);
        true
    }

    pub fn remove_material(&mut self, id: MaterialId, backend: &mut dyn RenderBackend) -> bool {
        let before = self.materials.len();
        self.materials.retain(|m| m.id != id);
        if self.materials.len() == before {
            return false;
        }
        self.update(backend);
        true
    }

    pub fn clear_materials(&mut self) {
        self.materials.clear();
    }

    fn load_materials(&mut self) {
        self.materials.clear();
        match self.source.load_materials() {
            Ok(materials) => {
                for material in materials {
                    if !self.materials.iter().any(|m| m.id == material.id) {
                        self.materials.push(material);
                    }
                }
                tracing::info!(
                    count = self.materials.len(),
                    source = %self.source.describe(),
                    "loaded bend materials"
                );
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.source.describe(),
                    error = %e,
                    "failed to load bend materials"
                );
            }
        }
    }
}

impl PassHooks for BendingManager {
    fn begin_camera_pass(&mut self, backend: &mut dyn RenderBackend) {
        if !self.subscribed || !self.settings.enabled {
            return;
        }
        let Some(camera) = self.camera.as_ref() else {
            return;
        };
        backend.set_culling_matrix(expanded_culling_matrix(&self.settings, camera));
    }

    fn end_camera_pass(&mut self, backend: &mut dyn RenderBackend) {
        if self.subscribed && self.camera.is_some() {
            backend.reset_culling_matrix();
        }
    }
}
