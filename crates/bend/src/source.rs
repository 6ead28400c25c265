//! Material discovery for the bend effect.
//!
//! Directory layout read by [`DirectoryMaterialSource`]:
//! ```text
//! materials/
//!   ground.yaml     - id: 1, name: ground
//!   water.yaml      - id: 2, name: water
//! ```

use std::path::{Path, PathBuf};

use diorama_common::MaterialId;
use serde::{Deserialize, Serialize};

/// A material participating in the bend effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
}

impl Material {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: MaterialId(id),
            name: name.into(),
        }
    }
}

/// Errors from loading materials.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid material descriptor {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Supplies the list of materials the bend effect drives.
pub trait MaterialSource {
    /// Short description for logs.
    fn describe(&self) -> String;

    fn load_materials(&self) -> Result<Vec<Material>, SourceError>;
}

/// A fixed in-memory material list.
#[derive(Debug, Clone, Default)]
pub struct StaticMaterialSource {
    materials: Vec<Material>,
}

impl StaticMaterialSource {
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }
}

impl MaterialSource for StaticMaterialSource {
    fn describe(&self) -> String {
        format!("static list ({} materials)", self.materials.len())
    }

    fn load_materials(&self) -> Result<Vec<Material>, SourceError> {
        Ok(self.materials.clone())
    }
}

/// Reads one YAML material descriptor per `*.yaml` / `*.yml` file in a
/// folder, in file-name order. Subdirectories are not searched.
#[derive(Debug, Clone)]
pub struct DirectoryMaterialSource {
    dir: PathBuf,
}

impl DirectoryMaterialSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MaterialSource for DirectoryMaterialSource {
    fn describe(&self) -> String {
        format!("folder {}", self.dir.display())
    }

    fn load_materials(&self) -> Result<Vec<Material>, SourceError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(|e| io_error(&self.dir, e))? {
            let path = entry.map_err(|e| io_error(&self.dir, e))?.path();
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yaml" || e == "yml");
            if is_yaml && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let text = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
                serde_yaml::from_str(&text).map_err(|source| SourceError::Yaml { path, source })
            })
            .collect()
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_returns_its_list() {
        let source = StaticMaterialSource::new(vec![Material::new(1, "a"), Material::new(2, "b")]);
        let loaded = source.load_materials().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(source.describe().contains("2 materials"));
    }

    #[test]
    fn directory_source_reads_yaml_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_water.yaml"), "id: 2\nname: water\n").unwrap();
        std::fs::write(dir.path().join("a_ground.yml"), "id: 1\nname: ground\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a material").unwrap();
        std::fs::create_dir(dir.path().join("nested.yaml")).unwrap();

        let source = DirectoryMaterialSource::new(dir.path());
        let loaded = source.load_materials().unwrap();
        assert_eq!(loaded, vec![Material::new(1, "ground"), Material::new(2, "water")]);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryMaterialSource::new(dir.path().join("absent"));
        assert!(matches!(source.load_materials(), Err(SourceError::Io { .. })));
    }

    #[test]
    fn malformed_descriptor_is_a_yaml_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.yaml"), "id: [not a number\n").unwrap();
        let source = DirectoryMaterialSource::new(dir.path());
        let err = source.load_materials().unwrap_err();
        assert!(matches!(err, SourceError::Yaml { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }
}
