//! Core domain logic for the worker time tracker.
//!
//! This crate contains:
//! - Time values: instants and hour/minute durations
//! - Time intervals: the clock-in/clock-out state machine
//! - Reports: grouping intervals into days and weeks, with paging
//! - Use cases over pluggable project, interval, and settings stores

pub mod clock;
pub mod date;
mod error;
pub mod grouping;
pub mod memory;
pub mod paging;
pub mod project;
pub mod projects;
pub mod reports;
pub mod repository;
pub mod time;
pub mod time_interval;
pub mod time_report;
pub mod types;

pub use clock::{ClockIn, ClockOut, GetProjectTimeSince, MarkRegisteredTime, RemoveTime};
pub use date::TimeIntervalStartingPoint;
pub use error::DomainError;
pub use memory::{InMemoryKeyValueStore, InMemoryProjectRepository, InMemoryTimeIntervalRepository};
pub use paging::Page;
pub use project::{NewProject, Project};
pub use projects::{CreateProject, FindActiveProjects, FindProjects, RemoveProject};
pub use reports::TimeReports;
pub use repository::{AppKey, KeyValueStore, ProjectRepository, TimeIntervalRepository};
pub use time::{HoursMinutes, HoursMinutesFormat, Milliseconds};
pub use time_interval::{NewTimeInterval, TimeInterval, TimeIntervalBuilder, TimeIntervalState};
pub use time_report::{TimeReportDay, TimeReportItem, TimeReportWeek, WORKING_DAY};
pub use types::{LoadPosition, LoadRange, LoadSize, ProjectId, ProjectName, TimeIntervalId};
