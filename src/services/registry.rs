//! Project registry
//!
//! Maps project IDs to the folders they were initialized in. The JSON backend
//! stores a flat object in `~/.dxw/studio/projects.json`:
//!
//! ```json
//! { "demo": "/home/me/analyses/demo" }
//! ```

use crate::Result;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Registered projects, keyed by project ID
pub type ProjectMap = BTreeMap<String, PathBuf>;

/// Storage backend for registered projects
pub trait ProjectStore {
    /// All registered projects. Never fails: an unreadable store is empty.
    fn list(&self) -> ProjectMap;

    /// Insert or overwrite a project
    fn register(&self, project_id: &str, location: &Path) -> Result<()>;

    fn get(&self, project_id: &str) -> Option<PathBuf> {
        self.list().remove(project_id)
    }
}

/// Registry stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonRegistry {
    path: PathBuf,
}

impl JsonRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectStore for JsonRegistry {
    fn list(&self) -> ProjectMap {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    // Read-modify-write without locking; concurrent invocations can lose entries.
    fn register(&self, project_id: &str, location: &Path) -> Result<()> {
        let mut projects = self.list();
        projects.insert(project_id.to_string(), location.to_path_buf());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&projects)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-process registry
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    projects: RefCell<ProjectMap>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project_id: &str, location: impl Into<PathBuf>) -> Self {
        self.projects
            .borrow_mut()
            .insert(project_id.to_string(), location.into());
        self
    }
}

impl ProjectStore for MemoryRegistry {
    fn list(&self) -> ProjectMap {
        self.projects.borrow().clone()
    }

    fn register(&self, project_id: &str, location: &Path) -> Result<()> {
        self.projects
            .borrow_mut()
            .insert(project_id.to_string(), location.to_path_buf());
        Ok(())
    }
}
