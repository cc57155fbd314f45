pub mod metadata;
pub mod options;
pub mod service;

pub use metadata::{ProjectMetadata, ServiceInfo};
pub use options::{InitOptions, ProjectOptions, ServiceOptions};
pub use service::Service;
