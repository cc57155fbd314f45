//! Compose template rendering
//!
//! Placeholders use `{key}` syntax. `${VAR}` is left alone so compose
//! interpolation in user templates keeps working.

use crate::config::StudioPaths;
use crate::Result;
use anyhow::Context;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const COMPOSE_TEMPLATE: &str = include_str!("../../templates/docker-compose.yml");
pub const INIT_DB_SCRIPT: &str = include_str!("../../templates/init-db.sql");

pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";
pub const ENV_FILE_NAME: &str = ".env";
pub const INIT_DB_FILE_NAME: &str = "init-db.sql";

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\$?)\{([A-Za-z0-9_]+)\}").expect("valid placeholder regex")
    })
}

/// Substitute bound placeholders; unbound ones stay as literal text
pub fn render(template: &str, bindings: &BTreeMap<String, String>) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures| {
            if !caps[1].is_empty() {
                return caps[0].to_string();
            }
            match bindings.get(&caps[2]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Compose template, checking for a user override first
pub fn load_compose_template(paths: &StudioPaths) -> Result<String> {
    let override_path = paths.compose_template_override();
    if override_path.exists() {
        return fs::read_to_string(&override_path).with_context(|| {
            format!(
                "Failed to read template override '{}'",
                override_path.display()
            )
        });
    }
    Ok(COMPOSE_TEMPLATE.to_string())
}

/// Render `template` into `<folder>/docker-compose.yml`
pub fn write_compose(
    folder: &Path,
    template: &str,
    bindings: &BTreeMap<String, String>,
) -> Result<PathBuf> {
    let path = folder.join(COMPOSE_FILE_NAME);
    fs::write(&path, render(template, bindings))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

pub fn write_env_file(folder: &Path, project_id: &str) -> Result<PathBuf> {
    let path = folder.join(ENV_FILE_NAME);
    fs::write(&path, format!("COMPOSE_PROJECT_NAME={}", project_id))?;
    Ok(path)
}

/// Files the compose template mounts next to itself
pub fn copy_auxiliary(folder: &Path) -> Result<()> {
    fs::write(folder.join(INIT_DB_FILE_NAME), INIT_DB_SCRIPT)?;
    Ok(())
}
