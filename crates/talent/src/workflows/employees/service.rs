use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::clock::{Clock, SystemClock};
use super::domain::{
    Dependent, Employee, EmployeeDocument, EmployeeId, EmployeeStatus, Evaluation, HistoryEvent,
    HistoryEventId, Inspection, NewEmployee, Sanction,
};
use super::history::{plan_history_entry, plan_history_removal, HistoryEntryRequest};
use super::lifecycle::{
    can_be_highlighted, days_until_deadline, is_alert_due, plan_status_change,
    HighlightEligibility, HighlightPolicy, StatusRequest,
};
use super::repository::{
    AlertError, AlertPublisher, DeadlineAlert, EmployeeProfileView, EmployeeRepository,
    RecordRepository, RepositoryError,
};
use super::scoring::ScoreBreakdown;
use super::validation::{require_range, require_text, ValidationError};

/// Evaluations and inspections are graded on a 0 to 100 scale.
const MAX_RATING_SCORE: i64 = 100;

/// Service composing the lifecycle policy, scoring and the persistence collaborator.
pub struct EmployeeService<R, A> {
    repository: Arc<R>,
    alerts: Arc<A>,
    policy: HighlightPolicy,
    clock: Arc<dyn Clock>,
}

static EMPLOYEE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static HISTORY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_employee_id() -> EmployeeId {
    let id = EMPLOYEE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EmployeeId(format!("emp-{id:06}"))
}

fn next_history_id() -> HistoryEventId {
    let id = HISTORY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    HistoryEventId(format!("hist-{id:06}"))
}

fn require_rating(score: Option<i32>, field: &'static str) -> Result<(), ValidationError> {
    if let Some(score) = score {
        require_range(i64::from(score), field, 0, MAX_RATING_SCORE)?;
    }
    Ok(())
}

/// Result of recording or removing a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryOutcome {
    pub event: HistoryEvent,
    pub point_delta: i32,
    pub points: i32,
}

impl<R, A> EmployeeService<R, A>
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(repository: Arc<R>, alerts: Arc<A>, policy: HighlightPolicy) -> Self {
        Self::with_clock(repository, alerts, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: Arc<R>,
        alerts: Arc<A>,
        policy: HighlightPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            alerts,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &HighlightPolicy {
        &self.policy
    }

    /// Add an employee with status `Ativo` and the base point balance.
    pub fn create(&self, new_employee: NewEmployee) -> Result<Employee, EmployeeServiceError> {
        let name = require_text(&new_employee.name, "name")?;
        let lowered = name.to_lowercase();
        let collision = self
            .repository
            .list()?
            .into_iter()
            .any(|existing| existing.name.trim().to_lowercase() == lowered);
        if collision {
            return Err(ValidationError::DuplicateName(name).into());
        }

        let employee = new_employee.into_employee(next_employee_id());
        let stored = self.repository.insert(employee)?;
        info!(employee_id = %stored.id, "employee created");
        Ok(stored)
    }

    pub fn get(&self, id: &EmployeeId) -> Result<Employee, EmployeeServiceError> {
        let employee = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(employee)
    }

    /// Employee plus the freshly recomputed score and deadline alert state.
    pub fn profile(&self, id: &EmployeeId) -> Result<EmployeeProfileView, EmployeeServiceError> {
        let employee = self.get(id)?;
        let records = self.repository.records_for(id)?;
        let score = records.breakdown_for(&employee);
        Ok(self.profile_view(employee, score))
    }

    /// List employees whose name or tax id contains `query` (case-insensitive).
    pub fn search(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<EmployeeProfileView>, EmployeeServiceError> {
        let needle = query
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());
        let records = self.repository.all_records()?;

        let mut employees: Vec<Employee> = self
            .repository
            .list()?
            .into_iter()
            .filter(|employee| match &needle {
                Some(needle) => {
                    employee.name.to_lowercase().contains(needle.as_str())
                        || employee.tax_id.to_lowercase().contains(needle.as_str())
                }
                None => true,
            })
            .collect();
        employees.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(employees
            .into_iter()
            .map(|employee| {
                let score = records.breakdown_for(&employee);
                self.profile_view(employee, score)
            })
            .collect())
    }

    pub fn delete(&self, id: &EmployeeId) -> Result<(), EmployeeServiceError> {
        self.get(id)?;
        self.repository.delete(id)?;
        info!(employee_id = %id, "employee deleted");
        Ok(())
    }

    pub fn highlight_eligibility(
        &self,
        id: &EmployeeId,
    ) -> Result<HighlightEligibility, EmployeeServiceError> {
        let employee = self.get(id)?;
        let everyone = self.repository.list()?;
        let records = self.repository.records_for(id)?;
        Ok(can_be_highlighted(
            &employee,
            &everyone,
            &records,
            &self.policy,
            self.clock.now(),
        ))
    }

    /// Run the state machine for `request` and persist the resulting change.
    pub fn change_status(
        &self,
        id: &EmployeeId,
        request: StatusRequest,
    ) -> Result<Employee, EmployeeServiceError> {
        let mut employee = self.get(id)?;

        if request.target == EmployeeStatus::Highlighted {
            if let HighlightEligibility::Ineligible { reason } = self.highlight_eligibility(id)? {
                return Err(ValidationError::NotEligible(reason).into());
            }
        }

        let change = plan_status_change(&employee, &request, &self.policy, self.clock.now())?;
        change.apply(&mut employee);
        self.repository.update(employee.clone())?;

        info!(
            employee_id = %id,
            from = %change.from,
            to = %change.to,
            "employee status changed"
        );
        Ok(employee)
    }

    /// Record a history entry and move the persisted point balance.
    pub fn record_history(
        &self,
        id: &EmployeeId,
        request: HistoryEntryRequest,
    ) -> Result<HistoryOutcome, EmployeeServiceError> {
        let employee = self.get(id)?;
        let existing = self.repository.records_for(id)?.histories;
        let plan = plan_history_entry(id, next_history_id(), &existing, &request)?;

        // Two separate writes: a failed adjustment leaves the stored event in place.
        let event = self.repository.insert_history(plan.event.clone())?;
        let points = if plan.adjustment.is_noop() {
            employee.points
        } else {
            self.repository.adjust_points(&plan.adjustment)?
        };

        info!(
            employee_id = %id,
            kind = event.kind.label(),
            delta = plan.point_delta(),
            points,
            "history entry recorded"
        );
        Ok(HistoryOutcome {
            event,
            point_delta: plan.point_delta(),
            points,
        })
    }

    /// Delete a history entry, reversing the delta against the persisted balance.
    pub fn remove_history(
        &self,
        history_id: &HistoryEventId,
    ) -> Result<HistoryOutcome, EmployeeServiceError> {
        let event = self
            .repository
            .fetch_history(history_id)?
            .ok_or(RepositoryError::NotFound)?;
        let adjustment = plan_history_removal(&event);

        self.repository.delete_history(history_id)?;
        let points = if adjustment.is_noop() {
            self.get(&event.employee_id)?.points
        } else {
            self.repository.adjust_points(&adjustment)?
        };

        info!(
            employee_id = %event.employee_id,
            history_id = %history_id,
            delta = adjustment.delta,
            points,
            "history entry removed"
        );
        Ok(HistoryOutcome {
            event,
            point_delta: adjustment.delta,
            points,
        })
    }

    pub fn add_sanction(&self, sanction: Sanction) -> Result<(), EmployeeServiceError> {
        self.get(&sanction.employee_id)?;
        self.repository.insert_sanction(sanction)?;
        Ok(())
    }

    pub fn add_evaluation(&self, evaluation: Evaluation) -> Result<(), EmployeeServiceError> {
        self.get(&evaluation.employee_id)?;
        require_rating(evaluation.score, "evaluation score")?;
        self.repository.insert_evaluation(evaluation)?;
        Ok(())
    }

    pub fn add_inspection(&self, inspection: Inspection) -> Result<(), EmployeeServiceError> {
        self.get(&inspection.employee_id)?;
        require_rating(inspection.score, "inspection score")?;
        self.repository.insert_inspection(inspection)?;
        Ok(())
    }

    pub fn add_dependent(&self, dependent: Dependent) -> Result<Dependent, EmployeeServiceError> {
        self.get(&dependent.employee_id)?;
        let name = require_text(&dependent.name, "dependent name")?;
        let dependent = Dependent { name, ..dependent };
        self.repository.insert_dependent(dependent.clone())?;
        Ok(dependent)
    }

    pub fn dependents(&self, id: &EmployeeId) -> Result<Vec<Dependent>, EmployeeServiceError> {
        self.get(id)?;
        Ok(self.repository.dependents(id)?)
    }

    pub fn add_document(
        &self,
        document: EmployeeDocument,
    ) -> Result<EmployeeDocument, EmployeeServiceError> {
        self.get(&document.employee_id)?;
        let title = require_text(&document.title, "document title")?;
        let document = EmployeeDocument { title, ..document };
        self.repository.insert_document(document.clone())?;
        Ok(document)
    }

    pub fn documents(
        &self,
        id: &EmployeeId,
    ) -> Result<Vec<EmployeeDocument>, EmployeeServiceError> {
        self.get(id)?;
        Ok(self.repository.documents(id)?)
    }

    /// Alerts for every employee whose temporary status expires within the window.
    pub fn due_alerts(&self) -> Result<Vec<DeadlineAlert>, EmployeeServiceError> {
        let today = self.clock.today();
        let alerts = self
            .repository
            .list()?
            .into_iter()
            .filter(|employee| is_alert_due(employee, today))
            .filter_map(|employee| {
                let deadline = employee.deadline?;
                let days_remaining = days_until_deadline(&employee, today)?;
                let mut details = BTreeMap::new();
                details.insert("name".to_string(), employee.name.clone());
                details.insert("department".to_string(), employee.department.clone());
                Some(DeadlineAlert {
                    template: "status_deadline_approaching".to_string(),
                    employee_id: employee.id,
                    status: employee.status,
                    deadline,
                    days_remaining,
                    details,
                })
            })
            .collect();
        Ok(alerts)
    }

    /// Publish every due alert, returning how many were sent.
    pub fn dispatch_alerts(&self) -> Result<usize, EmployeeServiceError> {
        let alerts = self.due_alerts()?;
        let count = alerts.len();
        for alert in alerts {
            self.alerts.publish(alert)?;
        }
        info!(count, "deadline alerts dispatched");
        Ok(count)
    }

    fn profile_view(
        &self,
        employee: Employee,
        score: ScoreBreakdown,
    ) -> EmployeeProfileView {
        let today = self.clock.today();
        EmployeeProfileView {
            status_label: employee.status.label(),
            alert_due: is_alert_due(&employee, today),
            days_until_deadline: days_until_deadline(&employee, today),
            score,
            employee,
        }
    }
}

/// Error raised by the employee service.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Alert(#[from] AlertError),
}
