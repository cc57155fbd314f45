use crate::context::StudioContext;
use crate::models::ProjectMetadata;
use crate::services::ProjectStore;
use crate::Result;
use colored::Colorize;
use std::path::PathBuf;

/// One line of `studio list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub project_id: String,
    pub location: PathBuf,
    /// Whether the folder still holds a metadata file
    pub valid: bool,
}

pub fn rows(registry: &dyn ProjectStore) -> Vec<ListRow> {
    registry
        .list()
        .into_iter()
        .map(|(project_id, location)| ListRow {
            valid: ProjectMetadata::exists_in(&location),
            project_id,
            location,
        })
        .collect()
}

pub fn run(ctx: &StudioContext) -> Result<()> {
    let rows = rows(ctx.registry);
    if rows.is_empty() {
        println!(
            "{}",
            "No projects registered. Run 'studio init <projectID>' first.".yellow()
        );
        return Ok(());
    }

    let width = rows
        .iter()
        .map(|row| row.project_id.chars().count())
        .max()
        .unwrap_or(0)
        .max("projectID".len());

    println!(
        "{}  {}",
        format!("{:<width$}", "projectID", width = width).bold(),
        "location".bold()
    );
    for row in &rows {
        let location = row.location.display().to_string();
        if row.valid {
            println!("{:<width$}  {}", row.project_id, location, width = width);
        } else {
            println!(
                "{:<width$}  {} {}",
                row.project_id,
                location,
                "(missing)".red(),
                width = width
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryRegistry;
    use tempfile::TempDir;

    #[test]
    fn test_rows_mark_missing_projects() {
        let temp = TempDir::new().unwrap();
        let live = temp.path().join("live");
        std::fs::create_dir_all(&live).unwrap();
        ProjectMetadata::new("live").save(&live).unwrap();

        let registry = MemoryRegistry::new()
            .with_project("live", &live)
            .with_project("gone", temp.path().join("gone"));

        let rows = rows(&registry);
        assert_eq!(rows.len(), 2);
        // Sorted by project ID
        assert_eq!(rows[0].project_id, "gone");
        assert!(!rows[0].valid);
        assert_eq!(rows[1].location, live);
        assert!(rows[1].valid);
    }
}
