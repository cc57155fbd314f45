//! Well-known locations and the YAML defaults file
//!
//! Everything studio persists lives under `~/.dxw`:
//! - `~/.dxw/studio/projects.json`  - project registry
//! - `~/.dxw/studio/defaults.yml`   - optional user defaults (overrides the bundled file)
//! - `~/.dxw/studio/templates/`     - optional template overrides
//! - `~/.dxw/hub`                   - hub repository checkout

use crate::models::Service;
use crate::Result;
use anyhow::Context;
use serde_yaml::Value;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Name of the metadata file marking a folder as a studio project
pub const METADATA_FILE: &str = ".dxw-studio-project";

/// Environment variable holding the chronos container registry URL
pub const REGISTRY_ENV: &str = "CHRONOS_DOCKER_REGISTRY";

pub const BUNDLED_DEFAULTS: &str = include_str!("../templates/defaults.yml");

const DEFAULT_PORT_RANGE: RangeInclusive<u16> = 3000..=4000;

/// Filesystem locations used by studio
#[derive(Debug, Clone)]
pub struct StudioPaths {
    dxw_dir: PathBuf,
}

impl StudioPaths {
    /// Locations under the user's home directory (`~/.dxw`)
    pub fn from_home() -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(Self::at(home.join(".dxw")))
    }

    /// Locations under an explicit root, used by tests
    pub fn at(dxw_dir: impl Into<PathBuf>) -> Self {
        Self {
            dxw_dir: dxw_dir.into(),
        }
    }

    pub fn studio_dir(&self) -> PathBuf {
        self.dxw_dir.join("studio")
    }

    pub fn projects_file(&self) -> PathBuf {
        self.studio_dir().join("projects.json")
    }

    pub fn defaults_file(&self) -> PathBuf {
        self.studio_dir().join("defaults.yml")
    }

    pub fn compose_template_override(&self) -> PathBuf {
        self.studio_dir().join("templates").join("docker-compose.yml")
    }

    pub fn hub_dir(&self) -> PathBuf {
        self.dxw_dir.join("hub")
    }
}

/// Where the effective defaults came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultsSource {
    User(PathBuf),
    Bundled,
}

/// Key lookups over the defaults file
///
/// Keys are dotted paths (`services.chronos.tag`). A key missing from the
/// user file is looked up in the bundled defaults.
#[derive(Debug, Clone)]
pub struct Defaults {
    source: DefaultsSource,
    user: Option<Value>,
    bundled: Value,
}

impl Defaults {
    /// Load the user override if present, otherwise the bundled asset
    pub fn load(paths: &StudioPaths) -> Result<Self> {
        let path = paths.defaults_file();
        if !path.exists() {
            return Ok(Self::bundled());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read defaults file {}", path.display()))?;
        Self::from_yaml(&content, DefaultsSource::User(path.clone()))
            .with_context(|| format!("Failed to parse defaults file {}", path.display()))
    }

    /// Only the bundled defaults
    pub fn bundled() -> Self {
        Self {
            source: DefaultsSource::Bundled,
            user: None,
            bundled: serde_yaml::from_str(BUNDLED_DEFAULTS).unwrap_or(Value::Null),
        }
    }

    /// User defaults given as YAML text, layered over the bundled ones
    pub fn from_yaml(content: &str, source: DefaultsSource) -> Result<Self> {
        let user: Value = if content.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(content)?
        };
        Ok(Self {
            source,
            user: Some(user),
            ..Self::bundled()
        })
    }

    pub fn source(&self) -> &DefaultsSource {
        &self.source
    }

    /// Look up a dotted key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.user
            .as_ref()
            .and_then(|user| lookup(user, key))
            .or_else(|| lookup(&self.bundled, key))
    }

    /// Look up a scalar as text. Empty strings count as missing.
    pub fn get_str(&self, key: &str) -> Option<String> {
        let text = match self.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn network(&self) -> String {
        self.get_str("network")
            .unwrap_or_else(|| "traefiknet".to_string())
    }

    /// Host port range probed by the allocator
    pub fn port_range(&self) -> RangeInclusive<u16> {
        let start = self
            .get_u16("portRange.start")
            .unwrap_or(*DEFAULT_PORT_RANGE.start());
        let end = self
            .get_u16("portRange.end")
            .unwrap_or(*DEFAULT_PORT_RANGE.end());
        if start > end {
            return DEFAULT_PORT_RANGE;
        }
        start..=end
    }

    pub fn chronos_docker_registry(&self) -> Option<String> {
        self.get_str("chronosDockerRegistry")
    }

    pub fn service_tag(&self, service: Service) -> String {
        self.get_str(&format!("services.{}.tag", service.name()))
            .unwrap_or_else(|| "latest".to_string())
    }

    /// Image reference without tag. May contain `{chronosDockerRegistry}`.
    pub fn service_image(&self, service: Service) -> String {
        self.get_str(&format!("services.{}.image", service.name()))
            .unwrap_or_else(|| format!("{{chronosDockerRegistry}}/{}", service.name()))
    }

    pub fn docker_bin(&self) -> String {
        self.get_str("docker").unwrap_or_else(|| "docker".to_string())
    }

    pub fn docker_compose_bin(&self) -> String {
        self.get_str("dockerCompose")
            .unwrap_or_else(|| "docker-compose".to_string())
    }

    pub fn hub_repository(&self) -> Option<String> {
        self.get_str("hub.repository")
    }

    pub fn hub_branch(&self) -> String {
        self.get_str("hub.branch").unwrap_or_else(|| "main".to_string())
    }
}

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = root;
    for part in key.split('.') {
        current = current.as_mapping()?.get(part)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Write the bundled defaults to the user override path
pub fn write_user_defaults(paths: &StudioPaths) -> Result<PathBuf> {
    let path = paths.defaults_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, BUNDLED_DEFAULTS)?;
    Ok(path)
}

/// Resolve `path` against the current directory without touching the filesystem
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
