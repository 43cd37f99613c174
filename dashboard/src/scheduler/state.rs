//! Per-widget state machine
//!
//! Every fetch takes a [`Ticket`] when it is issued. A result is only
//! committed if its ticket is newer than the last committed one, so a slow
//! response can never replace the outcome of a fetch issued after it.

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing requested yet
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Issue order of one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Failure shown in place of a widget's data
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[error("{message}")]
pub struct WidgetError {
    /// Short text for the widget body, e.g. "Pulsed offline"
    pub message: String,
    /// Underlying cause, for logs and verbose output
    pub detail: String,
}

impl WidgetError {
    pub fn new(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: detail.into(),
        }
    }
}

/// Observable view of a widget
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot<T> {
    pub name: String,
    pub phase: Phase,
    pub data: Option<T>,
    pub error: Option<WidgetError>,
    pub updated_at: Option<DateTime<Local>>,
    pub consecutive_failures: u32,
}

impl<T> WidgetSnapshot<T> {
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Ready | Phase::Failed)
    }
}

#[derive(Debug)]
pub struct WidgetState<T> {
    name: String,
    phase: Phase,
    data: Option<T>,
    error: Option<WidgetError>,
    updated_at: Option<DateTime<Local>>,
    consecutive_failures: u32,
    issued: u64,
    committed: u64,
    stopped: bool,
}

impl<T: Clone> WidgetState<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phase: Phase::Idle,
            data: None,
            error: None,
            updated_at: None,
            consecutive_failures: 0,
            issued: 0,
            committed: 0,
            stopped: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&WidgetError> {
        self.error.as_ref()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Issue a ticket for a new fetch and enter `Loading`
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        if !self.stopped {
            self.phase = Phase::Loading;
        }
        Ticket(self.issued)
    }

    /// Apply a fetch result; returns false when it was discarded
    ///
    /// Discarded: the widget is stopped, or a fetch issued later has already
    /// been committed. A failure clears any previous data.
    pub fn commit(&mut self, ticket: Ticket, result: Result<T, WidgetError>) -> bool {
        if self.stopped || ticket.0 <= self.committed {
            return false;
        }
        self.committed = ticket.0;
        self.updated_at = Some(Local::now());

        let settled = match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.consecutive_failures = 0;
                Phase::Ready
            }
            Err(error) => {
                self.data = None;
                self.error = Some(error);
                self.consecutive_failures += 1;
                Phase::Failed
            }
        };

        // A newer fetch is still outstanding
        self.phase = if ticket.0 == self.issued {
            settled
        } else {
            Phase::Loading
        };
        true
    }

    /// Refuse all further commits
    pub fn stop(&mut self) {
        self.stopped = true;
        if self.phase == Phase::Loading {
            self.phase = if self.error.is_some() {
                Phase::Failed
            } else if self.data.is_some() {
                Phase::Ready
            } else {
                Phase::Idle
            };
        }
    }

    pub fn snapshot(&self) -> WidgetSnapshot<T> {
        WidgetSnapshot {
            name: self.name.clone(),
            phase: self.phase,
            data: self.data.clone(),
            error: self.error.clone(),
            updated_at: self.updated_at,
            consecutive_failures: self.consecutive_failures,
        }
    }
}
