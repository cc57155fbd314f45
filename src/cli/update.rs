use crate::context::StudioContext;
use crate::error::WarnAndContinue;
use crate::models::ProjectOptions;
use crate::orchestrator::ComposeAction;
use crate::services::images::{image_repository, is_newer};
use crate::services::{compose_file_for, resolve_project, ResolvedProject};
use crate::Result;
use colored::Colorize;

/// Pull the images of a project's compose file
///
/// With `latest`, the `latest` tag of every recorded image is pulled first and
/// compared with the version the project was created with.
pub fn run(ctx: &StudioContext, options: &ProjectOptions, latest: bool) -> Result<()> {
    let project = resolve_project(&options.project, ctx.registry)?;
    let compose_file = compose_file_for(options.file.as_deref(), &project)?;

    if latest {
        check_latest(ctx, &project);
    }

    ctx.compose().run(&compose_file, ComposeAction::Pull, &[])?;

    println!("{}", "✅ Images updated".green());
    Ok(())
}

fn check_latest(ctx: &StudioContext, project: &ResolvedProject) {
    println!("{}", "🔍 Checking for newer images...".cyan());
    let images = ctx.images();

    for (name, info) in &project.metadata.services {
        let Some(image) = &info.image else {
            continue;
        };
        let latest = format!("{}:latest", image_repository(image));
        let Some(version) = images.resolve_version(&latest).or_warn() else {
            continue;
        };

        if is_newer(&version, &info.version) {
            println!(
                "   {} {} → {} available",
                "📦".yellow(),
                name,
                version.green()
            );
            println!(
                "      {}",
                format!(
                    "Re-run studio init {} --{}-tag {} --force to switch",
                    project.project_id, name, version
                )
                .yellow()
            );
        } else {
            println!("   ✓ {} is up to date ({})", name, info.version);
        }
    }
}
