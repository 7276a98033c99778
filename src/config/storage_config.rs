use crate::config::root_dir;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
pub struct StorageConfig {
    /// Root of the backup file tree, one subdirectory per device.
    pub backup_root: String,
    /// The flat-file device registry.
    pub registry_path: String,
    /// Directory whose file names populate the model dropdown, if any.
    pub models_path: Option<String>,
}

impl StorageConfig {
    pub fn parse_backup_root(&self) -> PathBuf {
        resolve(&self.backup_root)
    }

    pub fn parse_registry_path(&self) -> PathBuf {
        resolve(&self.registry_path)
    }

    pub fn parse_models_dir(&self) -> Option<PathBuf> {
        self.models_path.as_deref().map(resolve)
    }
}

fn resolve(path: &str) -> PathBuf {
    let path = std::path::Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root_dir().join(path)
    }
}
