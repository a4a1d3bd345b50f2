//! `wk project` subcommands.

use std::io::Write;

use anyhow::Result;
use wk_core::{CreateProject, FindProjects, LoadRange, RemoveProject};

use crate::store::Store;

pub fn add<W: Write>(writer: &mut W, store: &Store, name: &str) -> Result<()> {
    let project = CreateProject::new(&store.projects).run(name)?;
    writeln!(writer, "Created project {} (id {})", project.name, project.id)?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, store: &Store, range: LoadRange) -> Result<()> {
    let page = FindProjects::new(&store.projects).page(range);

    if page.total_count == 0 {
        writeln!(writer, "No projects yet.")?;
        writeln!(writer)?;
        writeln!(writer, "Hint: Run 'wk project add <name>' to create one.")?;
        return Ok(());
    }

    for project in &page.items {
        writeln!(writer, "{} (id {})", project.name, project.id)?;
    }
    if page.has_more() {
        let next = page.position.value() + page.items.len();
        writeln!(
            writer,
            "... {} more (use --position {next})",
            page.total_count - next
        )?;
    }
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, store: &Store, name: &str) -> Result<()> {
    let project = FindProjects::new(&store.projects).by_name(name)?;
    RemoveProject::new(&store.projects, &store.intervals).run(&project)?;
    writeln!(writer, "Removed project {}", project.name)?;
    Ok(())
}
