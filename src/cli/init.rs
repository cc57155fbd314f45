use crate::config::{absolutize, REGISTRY_ENV};
use crate::context::StudioContext;
use crate::error::{SoftContext, StudioError, WarnAndContinue};
use crate::models::{InitOptions, ProjectMetadata, Service, ServiceInfo};
use crate::services::{hub, template};
use crate::Result;
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Folder holding the compose file unless `--flat` is given
pub const STUDIO_FOLDER: &str = "studio";
pub const DATA_FOLDER: &str = "data";

/// Folders of a project being initialized
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub studio_dir: PathBuf,
    pub data_dir: PathBuf,
    flat: bool,
}

impl ProjectLayout {
    pub fn new(root: PathBuf, flat: bool) -> Self {
        let studio_dir = if flat {
            root.clone()
        } else {
            root.join(STUDIO_FOLDER)
        };
        let data_dir = studio_dir.join(DATA_FOLDER);
        Self {
            root,
            studio_dir,
            data_dir,
            flat,
        }
    }

    pub fn service_data_dir(&self, service: Service) -> PathBuf {
        self.data_dir.join(service.name())
    }

    /// Compose file path as recorded in the metadata file
    pub fn compose_file_relative(&self) -> String {
        if self.flat {
            template::COMPOSE_FILE_NAME.to_string()
        } else {
            format!("{}/{}", STUDIO_FOLDER, template::COMPOSE_FILE_NAME)
        }
    }

    fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        for service in Service::ALL {
            fs::create_dir_all(self.service_data_dir(service))?;
        }
        Ok(())
    }
}

pub fn run(ctx: &StudioContext, project_id: &str, mut options: InitOptions) -> Result<PathBuf> {
    if project_id.trim().is_empty() || project_id.contains(['/', '\\']) {
        anyhow::bail!("Invalid project ID '{}': it is used as a folder name", project_id);
    }

    let base = if options.dir.exists() {
        fs::canonicalize(&options.dir)?
    } else {
        absolutize(&options.dir)?
    };
    let root = base.join(project_id);
    if root.exists() && !options.force {
        return Err(StudioError::ProjectExists {
            project_id: project_id.to_string(),
            folder: root,
        }
        .into());
    }

    println!(
        "{}",
        format!("🚀 Creating new folder {}", project_id).cyan().bold()
    );
    let layout = ProjectLayout::new(root, options.flat);
    layout.create()?;

    fill_options(ctx, &mut options)?;
    if !options.offline {
        resolve_versions(ctx, &mut options);
    }

    if ctx
        .registry
        .register(project_id, &layout.root)
        .soft("registry write")
        .or_warn()
        .is_some()
    {
        println!("   ✓ Registered {} → {}", project_id, layout.root.display());
    }

    println!("{}", "📝 Writing docker-compose files...".cyan());
    let compose_template = template::load_compose_template(&ctx.paths)?;
    let compose_file = template::write_compose(
        &layout.studio_dir,
        &compose_template,
        &options.bindings(project_id),
    )?;
    template::write_env_file(&layout.studio_dir, project_id)?;
    template::copy_auxiliary(&layout.studio_dir)?;
    println!("   ✓ {}", compose_file.display());

    if !options.offline {
        seed_data(ctx, &layout);
    }

    describe(project_id, &layout, &options).save(&layout.root)?;

    println!();
    println!(
        "{}",
        format!("✅ Project {} initialized successfully!", project_id)
            .green()
            .bold()
    );
    for service in Service::ALL {
        let port = options
            .service(service)
            .port
            .map(|p| p.to_string())
            .unwrap_or_default();
        println!("   {:<10} port {}", service.name(), port.yellow());
    }
    println!();
    println!("{}", "⏭️  Next Steps:".yellow().bold());
    println!("   {}", format!("studio start -p {}", project_id).cyan());

    Ok(layout.root)
}

/// Fill tags, ports, network, registry and images left unset on the command line
pub fn fill_options(ctx: &StudioContext, options: &mut InitOptions) -> Result<()> {
    let mut ports = ctx.port_allocator();
    for port in options.services.values().filter_map(|entry| entry.port) {
        ports.reserve(port);
    }
    for service in Service::ALL {
        let default_tag = ctx.defaults.service_tag(service);
        let entry = options.service_mut(service);
        if entry.tag.is_none() {
            entry.tag = Some(default_tag);
        }
        if entry.port.is_none() {
            let port = ports.allocate()?;
            println!("Allocating {} for {}", port.to_string().yellow(), service);
            entry.port = Some(port);
        }
    }

    if options.network.is_none() {
        options.network = Some(ctx.defaults.network());
    }

    if options.chronos_docker_registry.is_none() {
        options.chronos_docker_registry = match ctx.defaults.chronos_docker_registry() {
            Some(registry) => Some(registry),
            None => {
                println!(
                    "Chronos docker registry not found in environment variable {}",
                    REGISTRY_ENV.yellow()
                );
                Some(ctx.prompter.input(
                    "Please enter the location where chronos docker registry is located",
                )?)
            }
        };
    }
    let registry = options
        .chronos_docker_registry
        .as_deref()
        .map(|r| r.trim().trim_end_matches('/').to_string())
        .unwrap_or_default();
    if registry.is_empty() {
        eprintln!(
            "{}",
            "⚠️  No chronos docker registry given, chronos images will not resolve".yellow()
        );
    }
    options.chronos_docker_registry = Some(registry.clone());

    let registry_binding = BTreeMap::from([("chronosDockerRegistry".to_string(), registry)]);
    for service in Service::ALL {
        let image = template::render(&ctx.defaults.service_image(service), &registry_binding);
        let entry = options.service_mut(service);
        if entry.image.is_none() {
            entry.image = Some(image);
        }
    }
    Ok(())
}

/// Replace `latest` with the version the image reports, when it can be found out
fn resolve_versions(ctx: &StudioContext, options: &mut InitOptions) {
    let images = ctx.images();
    for service in Service::ALL {
        let entry = options.service_mut(service);
        let tag = entry.tag.clone().unwrap_or_else(|| "latest".to_string());
        if tag != "latest" {
            entry.version = Some(tag);
            continue;
        }
        let Some(image) = entry.image_ref() else {
            continue;
        };
        entry.version = images.resolve_version(&image).or_warn();
        if let Some(version) = &entry.version {
            println!("   ✓ {} latest is {}", service, version.yellow());
        }
    }
}

/// Seed data folders from the hub; a stale checkout is used when sync fails
fn seed_data(ctx: &StudioContext, layout: &ProjectLayout) {
    let hub_dir = match ctx.hub.sync().or_warn() {
        Some(dir) => dir,
        None => {
            let stale = ctx.paths.hub_dir();
            if !stale.is_dir() {
                return;
            }
            stale
        }
    };

    for service in Service::ALL {
        let Some(seed) = service.hub_seed() else {
            continue;
        };
        let target = layout.service_data_dir(service);
        if let Some(copied) = hub::seed_folder(&hub_dir, seed, &target).or_warn() {
            println!("   ✓ Seeded {} with {} files from the hub", service, copied);
        }
    }
}

/// Metadata written at the end of init
pub fn describe(
    project_id: &str,
    layout: &ProjectLayout,
    options: &InitOptions,
) -> ProjectMetadata {
    let mut metadata = ProjectMetadata::new(project_id);
    metadata.compose_file = Some(layout.compose_file_relative());
    for (service, entry) in &options.services {
        let version = entry
            .version
            .clone()
            .or_else(|| entry.tag.clone())
            .unwrap_or_else(|| "latest".to_string());
        metadata.services.insert(
            service.name().to_string(),
            ServiceInfo {
                port_url: entry.port.map(Service::port_url).unwrap_or_default(),
                traefik_url: service.traefik_url(project_id),
                version,
                image: entry.image_ref(),
            },
        );
    }
    metadata
}
