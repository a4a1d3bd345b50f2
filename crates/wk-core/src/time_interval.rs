//! The clock-in/clock-out lifecycle of a tracked time span.
//!
//! A [`TimeInterval`] is created `Active` by clocking in, becomes `Inactive`
//! when clocked out, and can then be toggled between `Inactive` and
//! `Registered`. Transitions return new values; nothing is mutated in place.
//! Every interval is validated on construction, so a value of this type always
//! has an id, a start, and a stop that is not before the start.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::time::{Milliseconds, ensure_ordered};
use crate::types::{ProjectId, TimeIntervalId};

/// Lifecycle state of a time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeIntervalState {
    /// Clocked in, not yet clocked out.
    Active,
    /// Clocked out.
    Inactive { stop: Milliseconds },
    /// Clocked out and marked as reported.
    Registered { stop: Milliseconds },
}

impl TimeIntervalState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive { .. } => "inactive",
            Self::Registered { .. } => "registered",
        }
    }
}

/// A validated clock-in/clock-out span for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeIntervalBuilder", into = "TimeIntervalBuilder")]
pub struct TimeInterval {
    id: TimeIntervalId,
    project_id: ProjectId,
    start: Milliseconds,
    state: TimeIntervalState,
}

impl TimeInterval {
    /// A freshly clocked-in interval.
    #[must_use]
    pub const fn active(id: TimeIntervalId, project_id: ProjectId, start: Milliseconds) -> Self {
        Self {
            id,
            project_id,
            start,
            state: TimeIntervalState::Active,
        }
    }

    #[must_use]
    pub const fn id(&self) -> TimeIntervalId {
        self.id
    }

    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    #[must_use]
    pub const fn start(&self) -> Milliseconds {
        self.start
    }

    /// Clock-out instant, `None` while active.
    #[must_use]
    pub const fn stop(&self) -> Option<Milliseconds> {
        match self.state {
            TimeIntervalState::Active => None,
            TimeIntervalState::Inactive { stop } | TimeIntervalState::Registered { stop } => {
                Some(stop)
            }
        }
    }

    #[must_use]
    pub const fn state(&self) -> TimeIntervalState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, TimeIntervalState::Active)
    }

    #[must_use]
    pub const fn is_registered(&self) -> bool {
        matches!(self.state, TimeIntervalState::Registered { .. })
    }

    /// Ends an active interval at `stop`.
    pub fn clock_out(&self, stop: Milliseconds) -> Result<Self, DomainError> {
        match self.state {
            TimeIntervalState::Active => {
                ensure_ordered(self.start, stop)?;
                Ok(Self {
                    state: TimeIntervalState::Inactive { stop },
                    ..*self
                })
            }
            state => Err(DomainError::UnsupportedOperation {
                operation: "clock out",
                state: state.as_str(),
            }),
        }
    }

    /// Flips between `Inactive` and `Registered`. Active intervals cannot be registered.
    pub fn toggle_registered(&self) -> Result<Self, DomainError> {
        let state = match self.state {
            TimeIntervalState::Inactive { stop } => TimeIntervalState::Registered { stop },
            TimeIntervalState::Registered { stop } => TimeIntervalState::Inactive { stop },
            TimeIntervalState::Active => {
                return Err(DomainError::UnsupportedOperation {
                    operation: "register",
                    state: self.state.as_str(),
                });
            }
        };
        Ok(Self {
            state,
            ..*self
        })
    }

    /// Elapsed time between clock in and clock out, zero while active.
    #[must_use]
    pub fn calculate_time(&self) -> Milliseconds {
        self.stop()
            .map_or(Milliseconds::EMPTY, |stop| stop - self.start)
    }

    /// Elapsed time, using `now` as the stop of an active interval.
    #[must_use]
    pub fn calculate_interval(&self, now: Milliseconds) -> Milliseconds {
        self.stop().unwrap_or(now) - self.start
    }

    #[must_use]
    pub fn to_builder(&self) -> TimeIntervalBuilder {
        TimeIntervalBuilder::from(self.clone())
    }
}

/// Unvalidated parts of a time interval.
///
/// This is also the serialized form of [`TimeInterval`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeIntervalBuilder {
    pub id: Option<TimeIntervalId>,
    pub project_id: ProjectId,
    pub start: Option<Milliseconds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Milliseconds>,
    #[serde(default)]
    pub is_registered: bool,
}

impl TimeIntervalBuilder {
    #[must_use]
    pub const fn new(project_id: ProjectId) -> Self {
        Self {
            id: None,
            project_id,
            start: None,
            stop: None,
            is_registered: false,
        }
    }

    #[must_use]
    pub const fn id(mut self, id: TimeIntervalId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub const fn start(mut self, start: Milliseconds) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub const fn stop(mut self, stop: Milliseconds) -> Self {
        self.stop = Some(stop);
        self
    }

    #[must_use]
    pub const fn registered(mut self, is_registered: bool) -> Self {
        self.is_registered = is_registered;
        self
    }

    /// Validates the parts. Without a stop the interval is active and the
    /// registered flag is ignored.
    pub fn build(self) -> Result<TimeInterval, DomainError> {
        let id = self.id.ok_or(DomainError::MissingTimeIntervalId)?;
        let start = self.start.ok_or(DomainError::MissingTimeIntervalStart)?;
        let state = match self.stop {
            None => TimeIntervalState::Active,
            Some(stop) => {
                ensure_ordered(start, stop)?;
                if self.is_registered {
                    TimeIntervalState::Registered { stop }
                } else {
                    TimeIntervalState::Inactive { stop }
                }
            }
        };
        Ok(TimeInterval {
            id,
            project_id: self.project_id,
            start,
            state,
        })
    }
}

impl TryFrom<TimeIntervalBuilder> for TimeInterval {
    type Error = DomainError;

    fn try_from(builder: TimeIntervalBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<TimeInterval> for TimeIntervalBuilder {
    fn from(interval: TimeInterval) -> Self {
        Self {
            id: Some(interval.id),
            project_id: interval.project_id,
            start: Some(interval.start),
            stop: interval.stop(),
            is_registered: interval.is_registered(),
        }
    }
}

/// An interval to be added to a store, which assigns its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NewTimeInterval {
    pub project_id: ProjectId,
    pub start: Milliseconds,
}

impl NewTimeInterval {
    #[must_use]
    pub const fn new(project_id: ProjectId, start: Milliseconds) -> Self {
        Self { project_id, start }
    }

    /// The active interval this becomes once stored under `id`.
    #[must_use]
    pub const fn with_id(self, id: TimeIntervalId) -> TimeInterval {
        TimeInterval::active(id, self.project_id, self.start)
    }
}
