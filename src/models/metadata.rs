//! Per-project metadata file (`.dxw-studio-project`)
//!
//! Its presence at a folder's root is what makes the folder a studio project.

use crate::config::METADATA_FILE;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Connection info recorded for one service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    #[serde(default)]
    pub port_url: String,

    #[serde(default)]
    pub traefik_url: String,

    /// Concrete version when `latest` could be resolved, else the tag
    #[serde(default)]
    pub version: String,

    /// Full image reference including tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    #[serde(rename = "projectID")]
    pub project_id: String,

    /// Compose file relative to the project root. Older projects lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_file: Option<String>,

    #[serde(default)]
    pub services: BTreeMap<String, ServiceInfo>,
}

impl ProjectMetadata {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            compose_file: None,
            services: BTreeMap::new(),
        }
    }

    pub fn path_in(folder: &Path) -> PathBuf {
        folder.join(METADATA_FILE)
    }

    /// The project validity predicate
    pub fn exists_in(folder: &Path) -> bool {
        Self::path_in(folder).is_file()
    }

    pub fn load(folder: &Path) -> Result<Self> {
        let path = Self::path_in(folder);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::path_in(folder), content)?;
        Ok(())
    }

    /// Compose file recorded in the metadata, resolved against `location`
    pub fn compose_file_in(&self, location: &Path) -> Option<PathBuf> {
        self.compose_file
            .as_deref()
            .filter(|file| !file.trim().is_empty())
            .map(|file| location.join(file))
    }
}
