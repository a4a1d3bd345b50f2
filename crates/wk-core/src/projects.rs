//! Project use cases.

use crate::error::DomainError;
use crate::paging::Page;
use crate::project::{NewProject, Project};
use crate::repository::{ProjectRepository, TimeIntervalRepository};
use crate::types::{LoadRange, ProjectName};

/// Adds a project with a unique name.
pub struct CreateProject<'a, P: ?Sized> {
    projects: &'a P,
}

impl<'a, P: ProjectRepository + ?Sized> CreateProject<'a, P> {
    pub const fn new(projects: &'a P) -> Self {
        Self { projects }
    }

    /// Fails with [`DomainError::ProjectAlreadyExists`] if a project with the
    /// same name, ignoring case, exists.
    pub fn run(&self, name: &str) -> Result<Project, DomainError> {
        let name = ProjectName::new(name)?;
        if let Some(existing) = self.projects.find_by_name(name.as_str()) {
            return Err(DomainError::ProjectAlreadyExists {
                name: existing.name.into(),
            });
        }

        let project = self.projects.add(NewProject::new(name))?;
        tracing::debug!(project = %project.name, project_id = %project.id, "created project");
        Ok(project)
    }
}

/// Lookups over the project store.
pub struct FindProjects<'a, P: ?Sized> {
    projects: &'a P,
}

impl<'a, P: ProjectRepository + ?Sized> FindProjects<'a, P> {
    pub const fn new(projects: &'a P) -> Self {
        Self { projects }
    }

    pub fn count(&self) -> usize {
        self.projects.count()
    }

    /// All projects ordered by name.
    pub fn all(&self) -> Vec<Project> {
        self.projects.find_all()
    }

    /// A window of projects ordered by name.
    pub fn page(&self, range: LoadRange) -> Page<Project> {
        Page {
            position: range.position,
            total_count: self.projects.count(),
            items: self.projects.find_page(range),
        }
    }

    /// Fails with [`DomainError::NoProject`] when no project matches, ignoring case.
    pub fn by_name(&self, name: &str) -> Result<Project, DomainError> {
        self.projects
            .find_by_name(name)
            .ok_or_else(|| DomainError::NoProject {
                name: name.trim().to_string(),
            })
    }
}

/// Projects that are currently clocked in, ordered by name.
pub struct FindActiveProjects<'a, P: ?Sized, R: ?Sized> {
    projects: &'a P,
    intervals: &'a R,
}

impl<'a, P, R> FindActiveProjects<'a, P, R>
where
    P: ProjectRepository + ?Sized,
    R: TimeIntervalRepository + ?Sized,
{
    pub const fn new(projects: &'a P, intervals: &'a R) -> Self {
        Self {
            projects,
            intervals,
        }
    }

    pub fn run(&self) -> Vec<Project> {
        self.projects
            .find_all()
            .into_iter()
            .filter(|project| {
                self.intervals
                    .find_active_by_project_id(project.id)
                    .is_some()
            })
            .collect()
    }
}

/// Deletes a project together with its time intervals.
pub struct RemoveProject<'a, P: ?Sized, R: ?Sized> {
    projects: &'a P,
    intervals: &'a R,
}

impl<'a, P, R> RemoveProject<'a, P, R>
where
    P: ProjectRepository + ?Sized,
    R: TimeIntervalRepository + ?Sized,
{
    pub const fn new(projects: &'a P, intervals: &'a R) -> Self {
        Self {
            projects,
            intervals,
        }
    }

    pub fn run(&self, project: &Project) -> Result<(), DomainError> {
        if self.projects.find_by_id(project.id).is_none() {
            return Err(DomainError::NoProject {
                name: project.name.to_string(),
            });
        }

        self.intervals.remove_by_project_id(project.id);
        self.projects.remove(project);
        tracing::debug!(project = %project.name, project_id = %project.id, "removed project");
        Ok(())
    }
}
