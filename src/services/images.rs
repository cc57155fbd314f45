//! Image metadata lookups through the docker CLI
//!
//! Used to turn a `latest` tag into the concrete version an image was built
//! from. Every lookup is best-effort.

use crate::error::{SoftContext, SoftFailure, StepResult};
use crate::orchestrator::{Invocation, ProcessRunner};
use crate::utils::spinner;
use semver::Version;
use std::collections::BTreeMap;

/// Labels carrying the image version, most specific first
pub const VERSION_LABELS: [&str; 2] = ["org.opencontainers.image.version", "version"];

pub struct ImageInspector<'a> {
    runner: &'a dyn ProcessRunner,
    docker: String,
}

impl<'a> ImageInspector<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, docker: impl Into<String>) -> Self {
        Self {
            runner,
            docker: docker.into(),
        }
    }

    pub fn pull(&self, image: &str) -> StepResult<()> {
        let invocation = Invocation::new(&self.docker)
            .args(["pull", "-q", image])
            .captured();
        let outcome = self.runner.run(&invocation).soft("image pull")?;
        if !outcome.success() {
            return Err(SoftFailure::new(
                "image pull",
                format!("{} ({})", image, outcome.stderr.trim()),
            ));
        }
        Ok(())
    }

    /// Version label of a local image
    pub fn version_label(&self, image: &str) -> StepResult<String> {
        let invocation = Invocation::new(&self.docker)
            .args(["image", "inspect", "--format", "{{json .Config.Labels}}", image])
            .captured();
        let outcome = self.runner.run(&invocation).soft("image inspect")?;
        if !outcome.success() {
            return Err(SoftFailure::new(
                "image inspect",
                format!("{} ({})", image, outcome.stderr.trim()),
            ));
        }

        let labels: Option<BTreeMap<String, String>> =
            serde_json::from_str(outcome.stdout.trim()).soft("image inspect")?;
        labels
            .and_then(|labels| {
                VERSION_LABELS
                    .iter()
                    .find_map(|key| labels.get(*key).cloned())
            })
            .filter(|version| !version.trim().is_empty())
            .ok_or_else(|| {
                SoftFailure::new("image inspect", format!("{} has no version label", image))
            })
    }

    /// Pull `image` and read its version label
    pub fn resolve_version(&self, image: &str) -> StepResult<String> {
        let pb = spinner::start(format!("Resolving version of {}...", image));
        let result = self.pull(image).and_then(|_| self.version_label(image));
        pb.finish_and_clear();
        result
    }
}

/// Image reference without its tag (`host:5000/chronos:2.0` -> `host:5000/chronos`)
pub fn image_repository(image: &str) -> &str {
    match image.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => repo,
        _ => image,
    }
}

/// Compare versions using semver, falling back to string comparison
///
/// Backs the `update --latest` check. A leading `v` is ignored.
pub fn is_newer(new_version: &str, current: &str) -> bool {
    let new_ver = new_version.trim_start_matches('v');
    let curr_ver = current.trim_start_matches('v');

    let new_parsed = match Version::parse(new_ver) {
        Ok(v) => v,
        Err(_) => return new_ver > curr_ver,
    };

    // An unparsable current version ("latest", a branch name) is always older
    let current_parsed = match Version::parse(curr_ver) {
        Ok(v) => v,
        Err(_) => return true,
    };

    new_parsed > current_parsed
}
