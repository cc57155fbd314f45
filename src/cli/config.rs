use crate::config::{write_user_defaults, DefaultsSource, BUNDLED_DEFAULTS};
use crate::context::StudioContext;
use crate::Result;
use colored::Colorize;
use std::fs;

/// Show the defaults in effect, or write the bundled ones to the user file
pub fn run(ctx: &StudioContext, init: bool, force: bool) -> Result<()> {
    if init {
        let path = ctx.paths.defaults_file();
        if path.exists() && !force {
            println!(
                "{}",
                format!("⚠️  {} already exists", path.display()).yellow()
            );
            println!("   Run with --force to overwrite it");
            return Ok(());
        }
        let path = write_user_defaults(&ctx.paths)?;
        println!(
            "{}",
            format!("✅ Wrote defaults to {}", path.display()).green()
        );
        return Ok(());
    }

    let content = match ctx.defaults.source() {
        DefaultsSource::User(path) => {
            println!("Using defaults from {}", path.display().to_string().yellow());
            fs::read_to_string(path)?
        }
        DefaultsSource::Bundled => {
            println!(
                "Using bundled defaults (create {} to override)",
                ctx.paths.defaults_file().display().to_string().yellow()
            );
            BUNDLED_DEFAULTS.to_string()
        }
    };
    println!();
    println!("{}", content.trim_end());
    Ok(())
}
