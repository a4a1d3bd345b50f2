//! Domain errors raised by construction and use cases.

use thiserror::Error;

use crate::time::Milliseconds;
use crate::types::{ProjectId, TimeIntervalId};

/// Errors for project and time interval operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Clock in requested while the project already has an active interval.
    #[error("project {project_id} is already clocked in (interval {interval_id})")]
    ActiveProject {
        project_id: ProjectId,
        interval_id: TimeIntervalId,
    },

    /// Clock out requested while the project has no active interval.
    #[error("project {project_id} is not clocked in")]
    InactiveProject { project_id: ProjectId },

    /// Stop instant precedes the start instant.
    #[error("clock out at {stop} is before clock in at {start}")]
    ClockOutBeforeClockIn {
        start: Milliseconds,
        stop: Milliseconds,
    },

    #[error("time interval is missing an id")]
    MissingTimeIntervalId,

    #[error("time interval is missing a start")]
    MissingTimeIntervalStart,

    /// The operation is not valid for the interval's current state.
    #[error("cannot {operation} a time interval that is {state}")]
    UnsupportedOperation {
        operation: &'static str,
        state: &'static str,
    },

    #[error("project \"{name}\" already exists")]
    ProjectAlreadyExists { name: String },

    #[error("project name cannot be empty")]
    InvalidProjectName,

    #[error("project \"{name}\" does not exist")]
    NoProject { name: String },

    #[error("project is missing an id")]
    NoProjectId,

    /// The store has handed out the largest representable id.
    #[error("no ids left to assign")]
    IdsExhausted,
}
