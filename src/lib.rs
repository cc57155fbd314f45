// Studio - scaffolds and manages local multi-container analysis environments
// Renders docker-compose projects, keeps a registry of them and drives docker-compose

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod services;
pub mod utils;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use context::StudioContext;
pub use error::{SoftFailure, StepResult, StudioError, WarnAndContinue};
pub use models::{InitOptions, ProjectMetadata, ProjectOptions, Service};
