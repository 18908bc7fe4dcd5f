//! Employee status state machine.
//!
//! Selecting a target status yields a [`PendingRequirement`] describing the data the caller
//! must collect. Once the details are supplied, [`plan_status_change`] validates them and
//! returns a [`StatusChange`] command that the caller applies to a snapshot and persists.

mod alerts;
mod highlight;

pub use alerts::{days_until_deadline, is_alert_due, ALERT_WINDOW_DAYS};
pub use highlight::{
    can_be_highlighted, HighlightEligibility, HighlightPolicy, MAX_HIGHLIGHT_DURATION_DAYS,
};

use std::fmt;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Employee, EmployeeId, EmployeeStatus, LeaveInfo, TerminationInfo};
use super::validation::{require_text, ValidationError};

/// Auxiliary data a target status needs before the transition can commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingRequirement {
    None,
    NeedsDeadline,
    NeedsLeaveInfo,
    NeedsTerminationInfo,
}

impl fmt::Display for PendingRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingRequirement::None => write!(f, "no additional data"),
            PendingRequirement::NeedsDeadline => write!(f, "a deadline date"),
            PendingRequirement::NeedsLeaveInfo => write!(f, "a leave start date and reason"),
            PendingRequirement::NeedsTerminationInfo => {
                write!(f, "a termination date and reason")
            }
        }
    }
}

pub const fn requirement_for(target: EmployeeStatus) -> PendingRequirement {
    match target {
        EmployeeStatus::Active | EmployeeStatus::Highlighted => PendingRequirement::None,
        EmployeeStatus::OnVacation | EmployeeStatus::NoticePeriod | EmployeeStatus::Probation => {
            PendingRequirement::NeedsDeadline
        }
        EmployeeStatus::OnLeave => PendingRequirement::NeedsLeaveInfo,
        EmployeeStatus::Inactive => PendingRequirement::NeedsTerminationInfo,
    }
}

/// Data collected for the target status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusDetails {
    #[default]
    None,
    Deadline {
        deadline: NaiveDate,
    },
    Leave {
        start_date: NaiveDate,
        reason: String,
    },
    Termination {
        date: NaiveDate,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub target: EmployeeStatus,
    #[serde(default)]
    pub details: StatusDetails,
}

/// Highlight bookkeeping carried by a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HighlightUpdate {
    Start {
        started_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        streak: u32,
    },
    /// Drop the highlight window; the streak and last-highlight stamp are kept.
    Clear,
}

/// Command describing every field a status transition writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub employee_id: EmployeeId,
    pub from: EmployeeStatus,
    pub to: EmployeeStatus,
    pub deadline: Option<NaiveDate>,
    pub leave: Option<LeaveInfo>,
    pub termination: Option<TerminationInfo>,
    pub highlight: HighlightUpdate,
}

impl StatusChange {
    pub fn apply(&self, employee: &mut Employee) {
        employee.status = self.to;
        employee.deadline = self.deadline;
        employee.leave = self.leave.clone();
        if let Some(termination) = &self.termination {
            employee.termination = Some(termination.clone());
        }

        match &self.highlight {
            HighlightUpdate::Start {
                started_at,
                ends_at,
                streak,
            } => {
                employee.highlight.streak = *streak;
                employee.highlight.last_highlighted_at = Some(*started_at);
                employee.highlight.started_at = Some(*started_at);
                employee.highlight.ends_at = Some(*ends_at);
            }
            HighlightUpdate::Clear => {
                employee.highlight.started_at = None;
                employee.highlight.ends_at = None;
            }
        }
    }
}

/// Validate a status request against the employee snapshot.
///
/// Highlight eligibility is a separate check ([`can_be_highlighted`]); this function only
/// enforces the data each status requires.
pub fn plan_status_change(
    employee: &Employee,
    request: &StatusRequest,
    policy: &HighlightPolicy,
    now: DateTime<Utc>,
) -> Result<StatusChange, ValidationError> {
    if employee.status.is_terminal() {
        return Err(ValidationError::TerminalStatus(employee.status));
    }

    let target = request.target;
    let missing = || ValidationError::MissingRequirement {
        status: target,
        requirement: requirement_for(target),
    };

    let mut change = StatusChange {
        employee_id: employee.id.clone(),
        from: employee.status,
        to: target,
        deadline: None,
        leave: None,
        termination: None,
        highlight: HighlightUpdate::Clear,
    };

    match target {
        EmployeeStatus::Active => {}
        EmployeeStatus::OnVacation | EmployeeStatus::NoticePeriod | EmployeeStatus::Probation => {
            match &request.details {
                StatusDetails::Deadline { deadline } => change.deadline = Some(*deadline),
                _ => return Err(missing()),
            }
        }
        EmployeeStatus::OnLeave => match &request.details {
            StatusDetails::Leave { start_date, reason } => {
                let reason = require_text(reason, "leave reason")?;
                change.leave = Some(LeaveInfo {
                    start_date: *start_date,
                    reason,
                });
            }
            _ => return Err(missing()),
        },
        EmployeeStatus::Highlighted => {
            let ends_at = highlight_end(now, policy.duration_days)?;
            change.deadline = Some(ends_at.date_naive());
            change.highlight = HighlightUpdate::Start {
                started_at: now,
                ends_at,
                streak: next_streak(employee, now),
            };
        }
        EmployeeStatus::Inactive => match &request.details {
            StatusDetails::Termination { date, reason } => {
                let reason = require_text(reason, "termination reason")?;
                change.termination = Some(TerminationInfo {
                    date: *date,
                    reason,
                });
            }
            _ => return Err(missing()),
        },
    }

    Ok(change)
}

fn highlight_end(
    now: DateTime<Utc>,
    duration_days: i64,
) -> Result<DateTime<Utc>, ValidationError> {
    let out_of_range = || ValidationError::OutOfRange {
        field: "highlight duration days",
        value: duration_days,
        min: 1,
        max: MAX_HIGHLIGHT_DURATION_DAYS,
    };
    if !(1..=MAX_HIGHLIGHT_DURATION_DAYS).contains(&duration_days) {
        return Err(out_of_range());
    }
    Duration::try_days(duration_days)
        .and_then(|window| now.checked_add_signed(window))
        .ok_or_else(out_of_range)
}

/// The streak restarts at 1 once the previous highlight is more than a year old.
fn next_streak(employee: &Employee, now: DateTime<Utc>) -> u32 {
    let one_year_ago = now.checked_sub_months(Months::new(12)).unwrap_or(now);
    match employee.highlight.last_highlighted_at {
        Some(last) if last >= one_year_ago => employee.highlight.streak + 1,
        _ => 1,
    }
}
