//! Error tiers
//!
//! Two kinds of failure exist in studio:
//! - [`StudioError`]: fatal, user-facing. `main` prints it with a hint and exits 1.
//! - [`SoftFailure`]: a best-effort step failed. The caller prints a warning and
//!   carries on (hub sync, seeding, registry write, image lookup).

use colored::Colorize;
use std::path::PathBuf;

/// Fatal failures surfaced to the user
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("project {project_id} already exists in {}", .folder.display())]
    ProjectExists { project_id: String, folder: PathBuf },

    #[error("{0} is neither a studio project folder nor a registered project")]
    InvalidProject(String),

    #[error("no docker-compose.yml file found at {}", .0.display())]
    ComposeFileMissing(PathBuf),

    #[error("command `{command}` failed with {status}")]
    CommandFailed { command: String, status: String },

    #[error("no free port left in range {start}-{end}")]
    PortsExhausted { start: u16, end: u16 },
}

impl StudioError {
    /// Guidance printed under the error message
    pub fn hint(&self) -> Option<String> {
        match self {
            StudioError::ProjectExists { .. } => {
                Some(format!("Use {} to overwrite the folder", "--force".yellow()))
            }
            StudioError::InvalidProject(_) => Some(format!(
                "Use {} to list all registered projects",
                "studio ls".yellow()
            )),
            StudioError::ComposeFileMissing(_) => Some(format!(
                "Please create it or specify a valid compose file via the {} option",
                "--file | -f".yellow()
            )),
            StudioError::CommandFailed { .. } => None,
            StudioError::PortsExhausted { .. } => Some(format!(
                "Pass the port explicitly or widen {} in the defaults file",
                "portRange".yellow()
            )),
        }
    }
}

/// A best-effort step that did not work out
#[derive(Debug, thiserror::Error)]
#[error("{step}: {reason}")]
pub struct SoftFailure {
    pub step: &'static str,
    pub reason: String,
}

impl SoftFailure {
    pub fn new(step: &'static str, reason: impl std::fmt::Display) -> Self {
        Self {
            step,
            reason: reason.to_string(),
        }
    }
}

/// Result of a step whose failure must not abort the command
pub type StepResult<T> = std::result::Result<T, SoftFailure>;

/// Downgrade a [`StepResult`] to a printed warning
pub trait WarnAndContinue<T> {
    fn or_warn(self) -> Option<T>;
}

impl<T> WarnAndContinue<T> for StepResult<T> {
    fn or_warn(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(failure) => {
                eprintln!("{}", format!("⚠️  {}", failure).yellow());
                None
            }
        }
    }
}

/// Attach a step name to any displayable error
pub trait SoftContext<T> {
    fn soft(self, step: &'static str) -> StepResult<T>;
}

impl<T, E: std::fmt::Display> SoftContext<T> for std::result::Result<T, E> {
    fn soft(self, step: &'static str) -> StepResult<T> {
        self.map_err(|e| SoftFailure::new(step, e))
    }
}
