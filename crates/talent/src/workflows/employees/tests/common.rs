use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::employees::domain::{
    Dependent, Employee, EmployeeDocument, EmployeeId, EmployeeRecords, EmployeeStatus,
    Evaluation, HighlightState, HistoryEvent, HistoryEventId, HistoryKind, Inspection,
    NewEmployee, Sanction, SanctionKind,
};
use crate::workflows::employees::history::PointsAdjustment;
use crate::workflows::employees::repository::{
    AlertError, AlertPublisher, DeadlineAlert, EmployeeRepository, RecordRepository,
    RepositoryError,
};
use crate::workflows::employees::{EmployeeService, FixedClock, HighlightPolicy};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn today() -> NaiveDate {
    now().date_naive()
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn employee(id: &str) -> Employee {
    Employee {
        id: EmployeeId(id.to_string()),
        name: format!("Employee {id}"),
        tax_id: "123.456.789-00".to_string(),
        role: "Analista".to_string(),
        level: "Pleno".to_string(),
        department: "Operações".to_string(),
        company: "Matriz".to_string(),
        admission_date: date(2024, 1, 10),
        monthly_salary_cents: Some(450_000),
        contract_type: "CLT".to_string(),
        status: EmployeeStatus::Active,
        deadline: None,
        leave: None,
        termination: None,
        highlight: HighlightState::default(),
        points: 10,
    }
}

pub(super) fn with_status(id: &str, status: EmployeeStatus) -> Employee {
    Employee {
        status,
        ..employee(id)
    }
}

pub(super) fn new_employee(name: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        tax_id: "987.654.321-00".to_string(),
        role: "Técnico".to_string(),
        level: "Junior".to_string(),
        department: "Manutenção".to_string(),
        company: "Filial".to_string(),
        admission_date: date(2024, 2, 1),
        monthly_salary_cents: None,
        contract_type: "CLT".to_string(),
    }
}

pub(super) fn history(
    id: &str,
    employee_id: &str,
    kind: HistoryKind,
    on: NaiveDate,
) -> HistoryEvent {
    HistoryEvent {
        id: HistoryEventId(id.to_string()),
        employee_id: EmployeeId(employee_id.to_string()),
        kind,
        date: on,
        description: "registro".to_string(),
    }
}

pub(super) fn sanction(employee_id: &str, kind: SanctionKind) -> Sanction {
    Sanction {
        employee_id: EmployeeId(employee_id.to_string()),
        kind,
        applied_on: Some(date(2025, 3, 1)),
    }
}

pub(super) fn evaluation(employee_id: &str, score: Option<i32>) -> Evaluation {
    Evaluation {
        employee_id: EmployeeId(employee_id.to_string()),
        score,
        date: Some(date(2025, 4, 1)),
    }
}

pub(super) fn inspection(employee_id: &str, score: Option<i32>) -> Inspection {
    Inspection {
        employee_id: EmployeeId(employee_id.to_string()),
        score,
        date: Some(date(2025, 4, 2)),
    }
}

pub(super) fn build_service() -> (
    EmployeeService<MemoryRepository, MemoryAlerts>,
    Arc<MemoryRepository>,
    Arc<MemoryAlerts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service = EmployeeService::with_clock(
        repository.clone(),
        alerts.clone(),
        HighlightPolicy::default(),
        Arc::new(FixedClock(now())),
    );
    (service, repository, alerts)
}

#[derive(Default)]
pub(super) struct MemoryState {
    employees: HashMap<EmployeeId, Employee>,
    histories: Vec<HistoryEvent>,
    sanctions: Vec<Sanction>,
    evaluations: Vec<Evaluation>,
    inspections: Vec<Inspection>,
    dependents: Vec<Dependent>,
    documents: Vec<EmployeeDocument>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().expect("repository mutex poisoned")
    }

    pub(super) fn seed(&self, employee: Employee) {
        self.lock().employees.insert(employee.id.clone(), employee);
    }

    pub(super) fn history_count(&self) -> usize {
        self.lock().histories.len()
    }
}

impl EmployeeRepository for MemoryRepository {
    fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut guard = self.lock();
        if guard.employees.contains_key(&employee.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.employees.insert(employee.id.clone(), employee.clone());
        Ok(employee)
    }

    fn update(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut guard = self.lock();
        guard.employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    fn fetch(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.lock().employees.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.lock().employees.values().cloned().collect())
    }

    fn delete(&self, id: &EmployeeId) -> Result<(), RepositoryError> {
        let mut guard = self.lock();
        guard.employees.remove(id);
        guard.histories.retain(|event| &event.employee_id != id);
        guard.sanctions.retain(|sanction| &sanction.employee_id != id);
        guard.evaluations.retain(|evaluation| &evaluation.employee_id != id);
        guard.inspections.retain(|inspection| &inspection.employee_id != id);
        guard.dependents.retain(|dependent| &dependent.employee_id != id);
        guard.documents.retain(|document| &document.employee_id != id);
        Ok(())
    }

    fn adjust_points(&self, adjustment: &PointsAdjustment) -> Result<i32, RepositoryError> {
        let mut guard = self.lock();
        let employee = guard
            .employees
            .get_mut(&adjustment.employee_id)
            .ok_or(RepositoryError::NotFound)?;
        employee.points = adjustment.apply(employee.points);
        Ok(employee.points)
    }
}

impl RecordRepository for MemoryRepository {
    fn records_for(&self, id: &EmployeeId) -> Result<EmployeeRecords, RepositoryError> {
        let guard = self.lock();
        Ok(EmployeeRecords {
            histories: guard
                .histories
                .iter()
                .filter(|event| &event.employee_id == id)
                .cloned()
                .collect(),
            sanctions: guard
                .sanctions
                .iter()
                .filter(|sanction| &sanction.employee_id == id)
                .cloned()
                .collect(),
            evaluations: guard
                .evaluations
                .iter()
                .filter(|evaluation| &evaluation.employee_id == id)
                .cloned()
                .collect(),
            inspections: guard
                .inspections
                .iter()
                .filter(|inspection| &inspection.employee_id == id)
                .cloned()
                .collect(),
        })
    }

    fn all_records(&self) -> Result<EmployeeRecords, RepositoryError> {
        let guard = self.lock();
        Ok(EmployeeRecords {
            histories: guard.histories.clone(),
            sanctions: guard.sanctions.clone(),
            evaluations: guard.evaluations.clone(),
            inspections: guard.inspections.clone(),
        })
    }

    fn insert_history(&self, event: HistoryEvent) -> Result<HistoryEvent, RepositoryError> {
        let mut guard = self.lock();
        if guard.histories.iter().any(|existing| existing.id == event.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.histories.push(event.clone());
        Ok(event)
    }

    fn fetch_history(&self, id: &HistoryEventId) -> Result<Option<HistoryEvent>, RepositoryError> {
        Ok(self
            .lock()
            .histories
            .iter()
            .find(|event| &event.id == id)
            .cloned())
    }

    fn delete_history(&self, id: &HistoryEventId) -> Result<(), RepositoryError> {
        self.lock().histories.retain(|event| &event.id != id);
        Ok(())
    }

    fn insert_sanction(&self, sanction: Sanction) -> Result<(), RepositoryError> {
        self.lock().sanctions.push(sanction);
        Ok(())
    }

    fn insert_evaluation(&self, evaluation: Evaluation) -> Result<(), RepositoryError> {
        self.lock().evaluations.push(evaluation);
        Ok(())
    }

    fn insert_inspection(&self, inspection: Inspection) -> Result<(), RepositoryError> {
        self.lock().inspections.push(inspection);
        Ok(())
    }

    fn insert_dependent(&self, dependent: Dependent) -> Result<(), RepositoryError> {
        self.lock().dependents.push(dependent);
        Ok(())
    }

    fn dependents(&self, id: &EmployeeId) -> Result<Vec<Dependent>, RepositoryError> {
        Ok(self
            .lock()
            .dependents
            .iter()
            .filter(|dependent| &dependent.employee_id == id)
            .cloned()
            .collect())
    }

    fn insert_document(&self, document: EmployeeDocument) -> Result<(), RepositoryError> {
        self.lock().documents.push(document);
        Ok(())
    }

    fn documents(&self, id: &EmployeeId) -> Result<Vec<EmployeeDocument>, RepositoryError> {
        Ok(self
            .lock()
            .documents
            .iter()
            .filter(|document| &document.employee_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<DeadlineAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<DeadlineAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: DeadlineAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl EmployeeRepository for UnavailableRepository {
    fn insert(&self, _employee: Employee) -> Result<Employee, RepositoryError> {
        offline()
    }

    fn update(&self, _employee: Employee) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch(&self, _id: &EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        offline()
    }

    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        offline()
    }

    fn delete(&self, _id: &EmployeeId) -> Result<(), RepositoryError> {
        offline()
    }
}

impl RecordRepository for UnavailableRepository {
    fn records_for(&self, _id: &EmployeeId) -> Result<EmployeeRecords, RepositoryError> {
        offline()
    }

    fn all_records(&self) -> Result<EmployeeRecords, RepositoryError> {
        offline()
    }

    fn insert_history(&self, _event: HistoryEvent) -> Result<HistoryEvent, RepositoryError> {
        offline()
    }

    fn fetch_history(&self, _id: &HistoryEventId) -> Result<Option<HistoryEvent>, RepositoryError> {
        offline()
    }

    fn delete_history(&self, _id: &HistoryEventId) -> Result<(), RepositoryError> {
        offline()
    }

    fn insert_sanction(&self, _sanction: Sanction) -> Result<(), RepositoryError> {
        offline()
    }

    fn insert_evaluation(&self, _evaluation: Evaluation) -> Result<(), RepositoryError> {
        offline()
    }

    fn insert_inspection(&self, _inspection: Inspection) -> Result<(), RepositoryError> {
        offline()
    }

    fn insert_dependent(&self, _dependent: Dependent) -> Result<(), RepositoryError> {
        offline()
    }

    fn dependents(&self, _id: &EmployeeId) -> Result<Vec<Dependent>, RepositoryError> {
        offline()
    }

    fn insert_document(&self, _document: EmployeeDocument) -> Result<(), RepositoryError> {
        offline()
    }

    fn documents(&self, _id: &EmployeeId) -> Result<Vec<EmployeeDocument>, RepositoryError> {
        offline()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
