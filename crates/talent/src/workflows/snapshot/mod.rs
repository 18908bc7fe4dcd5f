//! Import of raw persistence rows exported as JSON.
//!
//! Rows keep the column names of the backing tables (`employees`, `employee_history`, ...).
//! Dual spellings such as `tipo`/`event_type` and `dataLimite`/`data_limite` are resolved
//! here once, so the policy modules only ever see the typed domain model.

mod rows;

pub use rows::NormalizeError;

use crate::workflows::employees::domain::{Employee, EmployeeRecords};
use rows::{RawEmployeeRow, RawHistoryRow, RawRatingRow, RawSanctionRow};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Normalize(NormalizeError),
}

impl std::fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read snapshot: {}", err),
            SnapshotImportError::Json(err) => write!(f, "invalid snapshot JSON: {}", err),
            SnapshotImportError::Normalize(err) => {
                write!(f, "could not normalize snapshot rows: {}", err)
            }
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Json(err) => Some(err),
            SnapshotImportError::Normalize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<NormalizeError> for SnapshotImportError {
    fn from(err: NormalizeError) -> Self {
        Self::Normalize(err)
    }
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    employees: Vec<RawEmployeeRow>,
    #[serde(default)]
    employee_history: Vec<RawHistoryRow>,
    #[serde(default)]
    employee_sanctions: Vec<RawSanctionRow>,
    #[serde(default)]
    employee_evaluations: Vec<RawRatingRow>,
    #[serde(default)]
    employee_inspections: Vec<RawRatingRow>,
}

/// Normalized employees plus every record collection the score reads.
#[derive(Debug, Clone, Default)]
pub struct EmployeeSnapshot {
    pub employees: Vec<Employee>,
    pub records: EmployeeRecords,
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<EmployeeSnapshot, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<EmployeeSnapshot, SnapshotImportError> {
        let raw: RawSnapshot = serde_json::from_reader(reader)?;

        let employees = raw
            .employees
            .into_iter()
            .map(RawEmployeeRow::into_employee)
            .collect::<Result<Vec<_>, _>>()?;

        let records = EmployeeRecords {
            histories: raw
                .employee_history
                .into_iter()
                .map(RawHistoryRow::into_event)
                .collect::<Result<Vec<_>, _>>()?,
            sanctions: raw
                .employee_sanctions
                .into_iter()
                .map(RawSanctionRow::into_sanction)
                .collect::<Result<Vec<_>, _>>()?,
            evaluations: raw
                .employee_evaluations
                .into_iter()
                .map(RawRatingRow::into_evaluation)
                .collect::<Result<Vec<_>, _>>()?,
            inspections: raw
                .employee_inspections
                .into_iter()
                .map(RawRatingRow::into_inspection)
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(EmployeeSnapshot { employees, records })
    }
}

impl EmployeeSnapshot {
    /// Records belonging to a single employee.
    pub fn records_for(&self, employee: &Employee) -> EmployeeRecords {
        EmployeeRecords {
            histories: self
                .records
                .histories
                .iter()
                .filter(|event| event.employee_id == employee.id)
                .cloned()
                .collect(),
            sanctions: self
                .records
                .sanctions
                .iter()
                .filter(|sanction| sanction.employee_id == employee.id)
                .cloned()
                .collect(),
            evaluations: self
                .records
                .evaluations
                .iter()
                .filter(|evaluation| evaluation.employee_id == employee.id)
                .cloned()
                .collect(),
            inspections: self
                .records
                .inspections
                .iter()
                .filter(|inspection| inspection.employee_id == employee.id)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SNAPSHOT: &str = r#"{
        "employees": [
            {"id": 1, "nome": "Ana", "data_admissao": "2023-02-01", "status": "Ativo", "points": 15},
            {"id": 2, "nome": "Bruno", "data_admissao": "2024-07-15", "status": "Destaque"}
        ],
        "employee_history": [
            {"id": 10, "employee_id": 1, "tipo": "positivo", "data": "2025-01-05"},
            {"id": 11, "employee_id": 2, "event_type": "falta", "data": "2025-01-06"}
        ],
        "employee_sanctions": [
            {"employee_id": "1", "tipo_sancao": "advertencia", "data_aplicacao": "2025-02-01"}
        ],
        "employee_evaluations": [
            {"employee_id": 1, "pontuacao": 87, "data": "2025-03-01"}
        ],
        "employee_inspections": [
            {"employee_id": 2, "pontuacao": 55}
        ]
    }"#;

    #[test]
    fn imports_and_scores_raw_rows() {
        let snapshot =
            SnapshotImporter::from_reader(Cursor::new(SNAPSHOT)).expect("snapshot imports");
        assert_eq!(snapshot.employees.len(), 2);

        let ana = &snapshot.employees[0];
        let bruno = &snapshot.employees[1];
        assert_eq!(ana.points, 15);
        // 10 + 5 - 10 + 8
        assert_eq!(snapshot.records.score_for(ana), 13);
        // 10 - 5 + 5 + 10 highlight bonus
        assert_eq!(snapshot.records.score_for(bruno), 20);
        assert_eq!(snapshot.records_for(ana).histories.len(), 1);
    }

    #[test]
    fn rejects_malformed_json() {
        match SnapshotImporter::from_reader(Cursor::new("{ not json")) {
            Err(SnapshotImportError::Json(_)) => {}
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn history_without_kind_becomes_a_scoring_warning() {
        let raw = r#"{
            "employees": [
                {"id": 1, "nome": "Ana", "data_admissao": "2023-02-01", "status": "Ativo"}
            ],
            "employee_history": [
                {"id": 10, "employee_id": 1, "data": "2025-01-05"}
            ]
        }"#;

        let snapshot = SnapshotImporter::from_reader(Cursor::new(raw)).expect("snapshot imports");
        let breakdown = snapshot.records.breakdown_for(&snapshot.employees[0]);

        assert_eq!(breakdown.total, 10);
        assert_eq!(breakdown.warnings.len(), 1);
    }
}
