use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use talent::workflows::employees::{
    AlertError, AlertPublisher, DeadlineAlert, Dependent, Employee, EmployeeDocument, EmployeeId,
    EmployeeRecords, EmployeeRepository, Evaluation, HistoryEvent, HistoryEventId, Inspection,
    PointsAdjustment, RecordRepository, RepositoryError, Sanction,
};
use talent::workflows::snapshot::EmployeeSnapshot;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    employees: HashMap<EmployeeId, Employee>,
    histories: Vec<HistoryEvent>,
    sanctions: Vec<Sanction>,
    evaluations: Vec<Evaluation>,
    inspections: Vec<Inspection>,
    dependents: Vec<Dependent>,
    documents: Vec<EmployeeDocument>,
}

impl Tables {
    fn records_matching(&self, id: Option<&EmployeeId>) -> EmployeeRecords {
        let wanted = |employee_id: &EmployeeId| id.map_or(true, |id| id == employee_id);
        EmployeeRecords {
            histories: self
                .histories
                .iter()
                .filter(|event| wanted(&event.employee_id))
                .cloned()
                .collect(),
            sanctions: self
                .sanctions
                .iter()
                .filter(|sanction| wanted(&sanction.employee_id))
                .cloned()
                .collect(),
            evaluations: self
                .evaluations
                .iter()
                .filter(|evaluation| wanted(&evaluation.employee_id))
                .cloned()
                .collect(),
            inspections: self
                .inspections
                .iter()
                .filter(|inspection| wanted(&inspection.employee_id))
                .cloned()
                .collect(),
        }
    }
}

/// Process-local store; every table sits behind one lock so point adjustments are atomic.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEmployeeRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryEmployeeRepository {
    pub(crate) fn from_snapshot(snapshot: EmployeeSnapshot) -> Self {
        let repository = Self::default();
        {
            let mut tables = repository.lock();
            for employee in snapshot.employees {
                tables.employees.insert(employee.id.clone(), employee);
            }
            let EmployeeRecords {
                histories,
                sanctions,
                evaluations,
                inspections,
            } = snapshot.records;
            tables.histories = histories;
            tables.sanctions = sanctions;
            tables.evaluations = evaluations;
            tables.inspections = inspections;
        }
        repository
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("repository mutex poisoned")
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut tables = self.lock();
        if tables.employees.contains_key(&employee.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.employees.insert(employee.id.clone(), employee.clone());
        Ok(employee)
    }

    fn update(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if tables.employees.contains_key(&employee.id) {
            tables.employees.insert(employee.id.clone(), employee);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.lock().employees.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.lock().employees.values().cloned().collect())
    }

    fn delete(&self, id: &EmployeeId) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if tables.employees.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        tables.histories.retain(|row| &row.employee_id != id);
        tables.sanctions.retain(|row| &row.employee_id != id);
        tables.evaluations.retain(|row| &row.employee_id != id);
        tables.inspections.retain(|row| &row.employee_id != id);
        tables.dependents.retain(|row| &row.employee_id != id);
        tables.documents.retain(|row| &row.employee_id != id);
        Ok(())
    }

    fn adjust_points(&self, adjustment: &PointsAdjustment) -> Result<i32, RepositoryError> {
        let mut tables = self.lock();
        let employee = tables
            .employees
            .get_mut(&adjustment.employee_id)
            .ok_or(RepositoryError::NotFound)?;
        employee.points = adjustment.apply(employee.points);
        Ok(employee.points)
    }
}

impl RecordRepository for InMemoryEmployeeRepository {
    fn records_for(&self, id: &EmployeeId) -> Result<EmployeeRecords, RepositoryError> {
        Ok(self.lock().records_matching(Some(id)))
    }

    fn all_records(&self) -> Result<EmployeeRecords, RepositoryError> {
        Ok(self.lock().records_matching(None))
    }

    fn insert_history(&self, event: HistoryEvent) -> Result<HistoryEvent, RepositoryError> {
        let mut tables = self.lock();
        if tables.histories.iter().any(|existing| existing.id == event.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.histories.push(event.clone());
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
        let mut tables = self.lock();
        let before = tables.histories.len();
        tables.histories.retain(|event| &event.id != id);
        if tables.histories.len() == before {
            return Err(RepositoryError::NotFound);
        }
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
            .filter(|row| &row.employee_id == id)
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
            .filter(|row| &row.employee_id == id)
            .cloned()
            .collect())
    }
}

/// Keeps published alerts in memory and logs each one.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<Vec<DeadlineAlert>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn publish(&self, alert: DeadlineAlert) -> Result<(), AlertError> {
        info!(
            employee_id = %alert.employee_id,
            status = %alert.status,
            days_remaining = alert.days_remaining,
            "status deadline approaching"
        );
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<DeadlineAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
