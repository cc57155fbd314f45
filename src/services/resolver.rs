//! Turns a user-supplied project reference into a project folder
//!
//! A reference is either a path to a project folder or a registered project
//! ID. Paths win: a folder holding a metadata file is used as-is, whatever the
//! registry says.

use super::registry::ProjectStore;
use crate::error::StudioError;
use crate::models::ProjectMetadata;
use crate::Result;
use anyhow::Context;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Legacy compose location used before the metadata recorded one
pub const LEGACY_COMPOSE_FILE: &str = "chronos/docker-compose.yml";

#[derive(Debug, Clone)]
pub struct ResolvedProject {
    pub project_id: String,
    pub location: PathBuf,
    pub metadata: ProjectMetadata,
}

pub fn resolve_project(reference: &str, registry: &dyn ProjectStore) -> Result<ResolvedProject> {
    let as_path = Path::new(reference);
    if ProjectMetadata::exists_in(as_path) {
        let location = fs::canonicalize(as_path)
            .with_context(|| format!("Failed to resolve {}", as_path.display()))?;
        let metadata = ProjectMetadata::load(&location)?;
        return Ok(ResolvedProject {
            project_id: metadata.project_id.clone(),
            location,
            metadata,
        });
    }

    eprintln!(
        "{}",
        format!(
            "⚠️  Folder {} is not a valid studio project folder, checking if it is a valid project name",
            reference
        )
        .yellow()
    );

    match registry.get(reference) {
        Some(location) if ProjectMetadata::exists_in(&location) => {
            let metadata = ProjectMetadata::load(&location)?;
            Ok(ResolvedProject {
                project_id: reference.to_string(),
                location,
                metadata,
            })
        }
        _ => Err(StudioError::InvalidProject(reference.to_string()).into()),
    }
}

/// Compose file of a resolved project
///
/// An explicit file wins when it exists. Otherwise the file recorded in the
/// metadata is used, falling back to the legacy location.
pub fn compose_file_for(explicit: Option<&Path>, project: &ResolvedProject) -> Result<PathBuf> {
    if let Some(file) = explicit {
        if file.exists() {
            return fs::canonicalize(file)
                .with_context(|| format!("Failed to resolve {}", file.display()));
        }
        println!(
            "Provided file {} does not exist. Falling back to default compose file...",
            file.display().to_string().yellow()
        );
    }

    let default = project
        .metadata
        .compose_file_in(&project.location)
        .unwrap_or_else(|| project.location.join(LEGACY_COMPOSE_FILE));
    if !default.exists() {
        return Err(StudioError::ComposeFileMissing(default).into());
    }
    Ok(default)
}
