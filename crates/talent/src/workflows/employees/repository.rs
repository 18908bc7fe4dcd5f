use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    Dependent, Employee, EmployeeDocument, EmployeeId, EmployeeRecords, EmployeeStatus,
    Evaluation, HistoryEvent, HistoryEventId, Inspection, Sanction,
};
use super::history::PointsAdjustment;
use super::scoring::ScoreBreakdown;

/// Storage abstraction for employee records.
pub trait EmployeeRepository: Send + Sync {
    fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    fn update(&self, employee: Employee) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    fn list(&self) -> Result<Vec<Employee>, RepositoryError>;
    /// Remove the employee together with every child collection keyed by its id.
    fn delete(&self, id: &EmployeeId) -> Result<(), RepositoryError>;

    /// Apply a point adjustment to the persisted balance and return the new value.
    ///
    /// The default is a plain read-modify-write against the stored value, so two
    /// concurrent adjustments are last-write-wins. Backends with an atomic increment
    /// should override it.
    fn adjust_points(&self, adjustment: &PointsAdjustment) -> Result<i32, RepositoryError> {
        let mut employee = self
            .fetch(&adjustment.employee_id)?
            .ok_or(RepositoryError::NotFound)?;
        employee.points = adjustment.apply(employee.points);
        let points = employee.points;
        self.update(employee)?;
        Ok(points)
    }
}

/// Storage abstraction for the collections hanging off an employee.
pub trait RecordRepository: Send + Sync {
    fn records_for(&self, id: &EmployeeId) -> Result<EmployeeRecords, RepositoryError>;
    fn all_records(&self) -> Result<EmployeeRecords, RepositoryError>;
    fn insert_history(&self, event: HistoryEvent) -> Result<HistoryEvent, RepositoryError>;
    fn fetch_history(&self, id: &HistoryEventId) -> Result<Option<HistoryEvent>, RepositoryError>;
    fn delete_history(&self, id: &HistoryEventId) -> Result<(), RepositoryError>;
    fn insert_sanction(&self, sanction: Sanction) -> Result<(), RepositoryError>;
    fn insert_evaluation(&self, evaluation: Evaluation) -> Result<(), RepositoryError>;
    fn insert_inspection(&self, inspection: Inspection) -> Result<(), RepositoryError>;
    fn insert_dependent(&self, dependent: Dependent) -> Result<(), RepositoryError>;
    fn dependents(&self, id: &EmployeeId) -> Result<Vec<Dependent>, RepositoryError>;
    fn insert_document(&self, document: EmployeeDocument) -> Result<(), RepositoryError>;
    fn documents(&self, id: &EmployeeId) -> Result<Vec<EmployeeDocument>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (toast, e-mail, chat adapters).
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: DeadlineAlert) -> Result<(), AlertError>;
}

/// Payload emitted when a temporary status is about to expire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineAlert {
    pub template: String,
    pub employee_id: EmployeeId,
    pub status: EmployeeStatus,
    pub deadline: NaiveDate,
    pub days_remaining: i64,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Employee snapshot enriched with the derived values shown to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeProfileView {
    pub employee: Employee,
    pub status_label: &'static str,
    pub score: ScoreBreakdown,
    pub alert_due: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_deadline: Option<i64>,
}
