//! Building blocks composed by the CLI commands

pub mod hub;
pub mod images;
pub mod ports;
pub mod registry;
pub mod resolver;
pub mod template;

pub use hub::{HubRepository, HubSync, LocalHub};
pub use images::ImageInspector;
pub use ports::PortAllocator;
pub use registry::{JsonRegistry, MemoryRegistry, ProjectMap, ProjectStore};
pub use resolver::{compose_file_for, resolve_project, ResolvedProject};
