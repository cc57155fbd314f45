use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Containers managed by studio that need a host port binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Chronos,
    Chronos1,
    Illustry,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Chronos, Service::Chronos1, Service::Illustry];

    /// Name used in the compose file, the metadata file and template keys
    pub fn name(&self) -> &'static str {
        match self {
            Service::Chronos => "chronos",
            Service::Chronos1 => "chronos1",
            Service::Illustry => "illustry",
        }
    }

    /// Folder inside the hub repository used to seed this service's data folder
    pub fn hub_seed(&self) -> Option<&'static str> {
        match self {
            Service::Chronos => Some("chronos2"),
            Service::Chronos1 | Service::Illustry => None,
        }
    }

    /// Template key for a per-service value, e.g. `chronos1Port`
    pub fn key(&self, suffix: &str) -> String {
        format!("{}{}", self.name(), suffix)
    }

    pub fn traefik_url(&self, project_id: &str) -> String {
        format!("https://{}.{}.localhost", self.name(), project_id)
    }

    pub fn port_url(port: u16) -> String {
        format!("http://localhost:{}", port)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown service: {}", s))
    }
}
