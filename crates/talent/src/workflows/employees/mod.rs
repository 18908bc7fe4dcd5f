//! Employee lifecycle and scoring policy.
//!
//! Policy functions ([`compute_score`], [`plan_status_change`], [`plan_history_entry`]) are
//! pure and operate on snapshots. [`EmployeeService`] fetches those snapshots from the
//! repository, applies the returned commands and writes the results back.

pub mod clock;
pub mod domain;
pub mod history;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    Dependent, Employee, EmployeeDocument, EmployeeId, EmployeeRecords, EmployeeStatus,
    Evaluation, HighlightState, HistoryEvent, HistoryEventId, HistoryKind, Inspection, LeaveInfo,
    NewEmployee, Sanction, SanctionKind, TerminationInfo, BASE_POINTS,
};
pub use history::{
    plan_history_entry, plan_history_removal, HistoryEntryPlan, HistoryEntryRequest,
    PointsAdjustment, MONTHLY_RATED_EVENT_LIMIT,
};
pub use lifecycle::{
    can_be_highlighted, days_until_deadline, is_alert_due, plan_status_change, requirement_for,
    HighlightEligibility, HighlightPolicy, HighlightUpdate, PendingRequirement, StatusChange,
    StatusDetails, StatusRequest, MAX_HIGHLIGHT_DURATION_DAYS,
};
pub use repository::{
    AlertError, AlertPublisher, DeadlineAlert, EmployeeProfileView, EmployeeRepository,
    RecordRepository, RepositoryError,
};
pub use router::employee_router;
pub use scoring::{
    compute_score, score_breakdown, DataQualityWarning, ScoreBreakdown, ScoreComponent,
    ScoreSource,
};
pub use service::{EmployeeService, EmployeeServiceError, HistoryOutcome};
pub use validation::ValidationError;
