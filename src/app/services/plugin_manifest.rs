use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::domain::menu::ModifierMask;
use crate::app::infrastructure::error::{AppError, Result};

/// A plugin described by a `*.toml` file in the plugins directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

/// One Plugins menu item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestEntry {
    pub title: String,
    pub command: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl ManifestEntry {
    pub fn modifier_mask(&self) -> Result<ModifierMask> {
        self.modifiers.iter().try_fold(ModifierMask::NONE, |mask, name| {
            ModifierMask::from_name(name)
                .map(|m| mask | m)
                .ok_or_else(|| AppError::Plugin(format!("unknown modifier {:?} in {:?}", name, self.title)))
        })
    }
}

impl PluginManifest {
    pub fn parse(text: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(text)?;
        if manifest.name.trim().is_empty() {
            return Err(AppError::Plugin("manifest has an empty name".to_string()));
        }
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

/// Manifest files in `dir`, sorted by file name.
pub fn manifest_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    Ok(paths)
}
