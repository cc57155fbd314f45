use super::Service;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Per-service options of `studio init`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceOptions {
    pub tag: Option<String>,
    pub port: Option<u16>,
    /// Image without tag, filled from the defaults file
    pub image: Option<String>,
    /// Concrete version behind `tag`, filled by the image lookup
    pub version: Option<String>,
}

impl ServiceOptions {
    pub fn image_ref(&self) -> Option<String> {
        let image = self.image.as_deref()?;
        let tag = self.tag.as_deref().unwrap_or("latest");
        Some(format!("{}:{}", image, tag))
    }
}

/// Options of `studio init`, filled in place before rendering
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Folder in which the `<projectID>` folder is created
    pub dir: PathBuf,
    /// Put the compose file at the project root instead of `studio/`
    pub flat: bool,
    pub force: bool,
    /// Skip hub sync and image version lookups
    pub offline: bool,
    pub chronos_docker_registry: Option<String>,
    pub network: Option<String>,
    pub services: BTreeMap<Service, ServiceOptions>,
}

impl InitOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            services: Service::ALL
                .into_iter()
                .map(|service| (service, ServiceOptions::default()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn service(&self, service: Service) -> &ServiceOptions {
        static EMPTY: ServiceOptions = ServiceOptions {
            tag: None,
            port: None,
            image: None,
            version: None,
        };
        self.services.get(&service).unwrap_or(&EMPTY)
    }

    pub fn service_mut(&mut self, service: Service) -> &mut ServiceOptions {
        self.services.entry(service).or_default()
    }

    pub fn with_tag(mut self, service: Service, tag: impl Into<String>) -> Self {
        self.service_mut(service).tag = Some(tag.into());
        self
    }

    pub fn with_port(mut self, service: Service, port: u16) -> Self {
        self.service_mut(service).port = Some(port);
        self
    }

    /// Flat key/value view used by the template renderer
    ///
    /// Unset values are left out so their placeholders survive rendering.
    pub fn bindings(&self, project_id: &str) -> BTreeMap<String, String> {
        let mut bindings = BTreeMap::new();
        bindings.insert("projectID".to_string(), project_id.to_string());
        if let Some(network) = &self.network {
            bindings.insert("network".to_string(), network.clone());
        }
        if let Some(registry) = &self.chronos_docker_registry {
            bindings.insert("chronosDockerRegistry".to_string(), registry.clone());
        }

        for (service, options) in &self.services {
            if let Some(tag) = &options.tag {
                bindings.insert(service.key("Tag"), tag.clone());
            }
            if let Some(port) = options.port {
                bindings.insert(service.key("Port"), port.to_string());
            }
            if let Some(image) = &options.image {
                bindings.insert(service.key("Image"), image.clone());
            }
            if let Some(version) = &options.version {
                bindings.insert(service.key("Version"), version.clone());
            }
        }
        bindings
    }
}

/// Options shared by start, stop and update
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    /// Project folder or registered project ID
    pub project: String,
    /// Explicit compose file
    pub file: Option<PathBuf>,
}
