//! Hub repository checkout
//!
//! The hub is a git repository of seed data. It is cloned to `~/.dxw/hub`
//! on first use and hard-reset to the remote branch afterwards.

use crate::error::{SoftContext, SoftFailure, StepResult};
use crate::utils::spinner;
use git2::build::RepoBuilder;
use git2::{ObjectType, Repository, ResetType};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source of seed data for new projects
pub trait HubSync {
    /// Bring the local checkout up to date and return its directory
    fn sync(&self) -> StepResult<PathBuf>;
}

/// Hub backed by a git remote
#[derive(Debug, Clone)]
pub struct HubRepository {
    url: String,
    branch: String,
    checkout: PathBuf,
}

impl HubRepository {
    pub fn new(
        url: impl Into<String>,
        branch: impl Into<String>,
        checkout: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            branch: branch.into(),
            checkout: checkout.into(),
        }
    }

    fn clone_fresh(&self) -> Result<(), git2::Error> {
        RepoBuilder::new()
            .branch(&self.branch)
            .clone(&self.url, &self.checkout)?;
        Ok(())
    }

    fn fast_forward(&self) -> Result<(), git2::Error> {
        let repo = Repository::open(&self.checkout)?;
        let mut remote = repo.find_remote("origin")?;
        remote.fetch(&[self.branch.as_str()], None, None)?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let target = fetch_head.peel(ObjectType::Commit)?;
        repo.reset(&target, ResetType::Hard, None)?;
        Ok(())
    }
}

impl HubSync for HubRepository {
    fn sync(&self) -> StepResult<PathBuf> {
        let existing = self.checkout.join(".git").exists();
        if !existing {
            if let Some(parent) = self.checkout.parent() {
                fs::create_dir_all(parent).soft("hub sync")?;
            }
        }

        let pb = spinner::start(format!("Updating hub repository {}...", self.url));
        let result = if existing {
            self.fast_forward()
        } else {
            self.clone_fresh()
        };
        pb.finish_and_clear();

        result.map(|_| self.checkout.clone()).map_err(|e| {
            SoftFailure::new(
                "hub sync",
                format!("could not update {}: {}", self.url, e.message()),
            )
        })
    }
}

/// Hub that is already on disk and never updated
#[derive(Debug, Clone)]
pub struct LocalHub(pub PathBuf);

impl HubSync for LocalHub {
    fn sync(&self) -> StepResult<PathBuf> {
        if self.0.is_dir() {
            Ok(self.0.clone())
        } else {
            Err(SoftFailure::new(
                "hub sync",
                format!("{} does not exist", self.0.display()),
            ))
        }
    }
}

/// Copy `<hub>/<seed>` into `target`, returning the number of files copied
pub fn seed_folder(hub_dir: &Path, seed: &str, target: &Path) -> StepResult<usize> {
    let source = hub_dir.join(seed);
    if !source.is_dir() {
        return Err(SoftFailure::new("seed data", format!("{} not found in hub", seed)));
    }

    let mut copied = 0;
    for entry in WalkDir::new(&source) {
        let entry = entry.soft("seed data")?;
        let relative = entry.path().strip_prefix(&source).soft("seed data")?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).soft("seed data")?;
        } else {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).soft("seed data")?;
            }
            fs::copy(entry.path(), &destination).soft("seed data")?;
            copied += 1;
        }
    }
    Ok(copied)
}
