use std::path::{Path, PathBuf};

use diorama_bend::{
    BendSettings, DirectoryMaterialSource, Material, MaterialSource, StaticMaterialSource,
};
use diorama_camera::{CameraError, CameraPose, RigConfig};
use diorama_grass::GrassConfig;
use diorama_input::Keymap;
use serde::{Deserialize, Serialize};

/// Everything a CLI run needs, loadable from one YAML file. Missing
/// sections fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraPose,
    pub rig: RigConfig,
    pub grass: GrassConfig,
    pub bend: BendSettings,
    pub keymap: Keymap,
    /// Folder of material descriptors; takes precedence over `materials`.
    pub materials_dir: Option<PathBuf>,
    pub materials: Vec<Material>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(#[from] CameraError),
}

impl SceneConfig {
    /// Load and validate a scene file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    /// Defaults, or the file at `path` when given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.rig.validate()?;
        Ok(())
    }

    /// Material provider for the bend controller. With nothing configured,
    /// a single material backs the grass.
    pub fn material_source(&self) -> Box<dyn MaterialSource> {
        if let Some(dir) = &self.materials_dir {
            return Box::new(DirectoryMaterialSource::new(dir.clone()));
        }
        let materials = if self.materials.is_empty() {
            vec![Material::new(GRASS_MATERIAL, "grass")]
        } else {
            self.materials.clone()
        };
        Box::new(StaticMaterialSource::new(materials))
    }
}

/// Material id the grass field draws with.
pub const GRASS_MATERIAL: u64 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_input::{Action, Key};

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(
            &path,
            concat!(
                "grass:\n  count: 50\n  seed: 7\n",
                "bend:\n  bend_angle: 15.0\n",
                "keymap:\n  w: move_forward\n",
            ),
        )
        .unwrap();

        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.grass.count, 50);
        assert_eq!(config.grass.seed, Some(7));
        assert_eq!(config.grass.blade_height, 1.0);
        assert_eq!(config.bend.bend_angle, 15.0);
        assert_eq!(config.bend.bend_distance, 20.0);
        assert_eq!(config.rig, RigConfig::default());
        assert_eq!(config.keymap.action_for(Key::W), Some(Action::MoveForward));
    }

    #[test]
    fn invalid_camera_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(&path, "camera:\n  screen_height_px: 0.0\n").unwrap();
        assert!(matches!(SceneConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        assert!(matches!(SceneConfig::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "grass: [1, 2\n").unwrap();
        let err = SceneConfig::load(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn default_material_source_backs_the_grass() {
        let source = SceneConfig::default().material_source();
        let materials = source.load_materials().unwrap();
        assert_eq!(materials, vec![Material::new(GRASS_MATERIAL, "grass")]);
    }

    #[test]
    fn materials_dir_wins_over_inline_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rock.yaml"), "id: 5\nname: rock\n").unwrap();
        let config = SceneConfig {
            materials_dir: Some(dir.path().to_path_buf()),
            materials: vec![Material::new(9, "ignored")],
            ..SceneConfig::default()
        };
        let materials = config.material_source().load_materials().unwrap();
        assert_eq!(materials, vec![Material::new(5, "rock")]);
    }
}
