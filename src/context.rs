//! Collaborators shared by every command
//!
//! Commands never reach for the home directory, the terminal or `docker`
//! directly; they go through a [`StudioContext`], so tests can swap in an
//! in-memory registry, scripted answers and a recording process runner.

use crate::config::{Defaults, StudioPaths};
use crate::orchestrator::{Compose, ProcessRunner};
use crate::prompt::Prompter;
use crate::services::images::ImageInspector;
use crate::services::ports::{is_port_free, PortAllocator, PortProbe};
use crate::services::{HubSync, ProjectStore};

pub struct StudioContext<'a> {
    pub paths: StudioPaths,
    pub defaults: Defaults,
    pub registry: &'a dyn ProjectStore,
    pub prompter: &'a dyn Prompter,
    pub runner: &'a dyn ProcessRunner,
    pub hub: &'a dyn HubSync,
    pub port_probe: PortProbe,
}

impl<'a> StudioContext<'a> {
    pub fn new(
        paths: StudioPaths,
        defaults: Defaults,
        registry: &'a dyn ProjectStore,
        prompter: &'a dyn Prompter,
        runner: &'a dyn ProcessRunner,
        hub: &'a dyn HubSync,
    ) -> Self {
        Self {
            paths,
            defaults,
            registry,
            prompter,
            runner,
            hub,
            port_probe: is_port_free,
        }
    }

    pub fn with_port_probe(mut self, probe: PortProbe) -> Self {
        self.port_probe = probe;
        self
    }

    pub fn port_allocator(&self) -> PortAllocator {
        PortAllocator::with_probe(self.defaults.port_range(), self.port_probe)
    }

    pub fn compose(&self) -> Compose<'a> {
        Compose::new(self.runner, self.defaults.docker_compose_bin())
    }

    pub fn images(&self) -> ImageInspector<'a> {
        ImageInspector::new(self.runner, self.defaults.docker_bin())
    }
}
