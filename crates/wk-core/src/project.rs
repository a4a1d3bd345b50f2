//! Projects that time is tracked against.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::{ProjectId, ProjectName};

/// A persisted project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: ProjectName,
}

impl Project {
    #[must_use]
    pub const fn new(id: ProjectId, name: ProjectName) -> Self {
        Self { id, name }
    }

    /// Builds a project from loosely-typed parts, validating each.
    pub fn from_parts(id: Option<ProjectId>, name: &str) -> Result<Self, DomainError> {
        let id = id.ok_or(DomainError::NoProjectId)?;
        let name = ProjectName::new(name)?;
        Ok(Self { id, name })
    }
}

/// A project that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewProject {
    pub name: ProjectName,
}

impl NewProject {
    #[must_use]
    pub const fn new(name: ProjectName) -> Self {
        Self { name }
    }
}
