use crate::context::StudioContext;
use crate::models::{ProjectOptions, Service};
use crate::orchestrator::ComposeAction;
use crate::services::{compose_file_for, resolve_project, ResolvedProject};
use crate::Result;
use colored::Colorize;

/// `docker-compose up -d` for a project
pub fn start(ctx: &StudioContext, services: &[String], options: &ProjectOptions) -> Result<()> {
    let project = resolve_project(&options.project, ctx.registry)?;
    let compose_file = compose_file_for(options.file.as_deref(), &project)?;

    ctx.compose().run(&compose_file, ComposeAction::Up, services)?;

    println!("{}", "✅ Successfully started containers".green());
    print_urls(&project);
    Ok(())
}

/// `docker-compose down` for a project
pub fn stop(ctx: &StudioContext, services: &[String], options: &ProjectOptions) -> Result<()> {
    let project = resolve_project(&options.project, ctx.registry)?;
    let compose_file = compose_file_for(options.file.as_deref(), &project)?;

    ctx.compose().run(&compose_file, ComposeAction::Down, services)?;

    println!("{}", "✅ Successfully stopped containers".green());
    Ok(())
}

fn print_urls(project: &ResolvedProject) {
    if project.metadata.services.is_empty() {
        // Projects created before service info was recorded
        for service in Service::ALL {
            println!(
                "   Visit {} at {}",
                service.name(),
                service.traefik_url(&project.project_id).cyan()
            );
        }
        return;
    }

    for (name, info) in &project.metadata.services {
        if info.port_url.is_empty() {
            println!("   Visit {} at {}", name, info.traefik_url.cyan());
        } else {
            println!(
                "   Visit {} at {} or {}",
                name,
                info.traefik_url.cyan(),
                info.port_url.cyan()
            );
        }
    }
}
