use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{EmployeeId, HistoryEvent, HistoryEventId, HistoryKind};
use super::scoring::history_delta;
use super::validation::{require_text, ValidationError};

/// Positive/negative records allowed per employee per calendar month.
pub const MONTHLY_RATED_EVENT_LIMIT: usize = 4;

/// Inbound "add to history" payload as collected by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryRequest {
    pub kind: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

/// Change to an employee's persisted `points`, floor-clamped at zero when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsAdjustment {
    pub employee_id: EmployeeId,
    pub delta: i32,
}

impl PointsAdjustment {
    pub fn apply(&self, current: i32) -> i32 {
        (current + self.delta).max(0)
    }

    pub fn is_noop(&self) -> bool {
        self.delta == 0
    }
}

/// Validated history entry plus the point change it causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryPlan {
    pub event: HistoryEvent,
    pub adjustment: PointsAdjustment,
}

impl HistoryEntryPlan {
    pub fn point_delta(&self) -> i32 {
        self.adjustment.delta
    }
}

/// Parse the kind of a new entry; only the three recordable kinds are accepted.
pub fn parse_recordable_kind(raw: &str) -> Result<HistoryKind, ValidationError> {
    match HistoryKind::parse(raw) {
        kind @ (HistoryKind::Positive | HistoryKind::Neutral | HistoryKind::Negative) => Ok(kind),
        _ => Err(ValidationError::UnknownEventKind(raw.trim().to_string())),
    }
}

/// Validate a new history entry against the employee's existing timeline.
pub fn plan_history_entry(
    employee_id: &EmployeeId,
    event_id: HistoryEventId,
    existing: &[HistoryEvent],
    request: &HistoryEntryRequest,
) -> Result<HistoryEntryPlan, ValidationError> {
    let kind = parse_recordable_kind(&request.kind)?;
    let date = request.date.ok_or(ValidationError::MissingField("date"))?;
    let description = require_text(&request.description, "description")?;

    if kind.is_rated() {
        let same_month = existing
            .iter()
            .filter(|event| &event.employee_id == employee_id)
            .filter(|event| event.kind.is_rated())
            .filter(|event| same_year_month(event.date, date))
            .count();
        if same_month >= MONTHLY_RATED_EVENT_LIMIT {
            return Err(ValidationError::MonthlyLimitReached {
                limit: MONTHLY_RATED_EVENT_LIMIT,
                month: date.format("%Y-%m").to_string(),
            });
        }
    }

    let delta = recording_delta(&kind);
    Ok(HistoryEntryPlan {
        event: HistoryEvent {
            id: event_id,
            employee_id: employee_id.clone(),
            kind,
            date,
            description,
        },
        adjustment: PointsAdjustment {
            employee_id: employee_id.clone(),
            delta,
        },
    })
}

/// Inverse of the delta the event applied when it was recorded.
pub fn plan_history_removal(event: &HistoryEvent) -> PointsAdjustment {
    PointsAdjustment {
        employee_id: event.employee_id.clone(),
        delta: -recording_delta(&event.kind),
    }
}

/// Only positive and negative entries move persisted points; absences and
/// unknown kinds are scored transiently but never touch `points`.
fn recording_delta(kind: &HistoryKind) -> i32 {
    if kind.is_rated() {
        history_delta(kind).unwrap_or(0)
    } else {
        0
    }
}

fn same_year_month(left: NaiveDate, right: NaiveDate) -> bool {
    left.year() == right.year() && left.month() == right.month()
}
