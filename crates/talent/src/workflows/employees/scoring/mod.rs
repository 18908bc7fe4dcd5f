mod rules;

pub(crate) use rules::history_delta;

use super::domain::{
    Employee, EmployeeId, EmployeeRecords, Evaluation, HistoryEvent, Inspection, Sanction,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Record family a score component was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    History,
    Sanction,
    Evaluation,
    Inspection,
    HighlightBonus,
}

/// Discrete contribution to a score, kept so the total can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub source: ScoreSource,
    pub points: i32,
    pub notes: String,
}

/// Non-fatal problem found while scoring; the record contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    #[error("employee {employee_id}: unrecognized history kind '{raw}'")]
    UnknownHistoryKind { employee_id: EmployeeId, raw: String },
    #[error("employee {employee_id}: unrecognized sanction kind '{raw}'")]
    UnknownSanctionKind { employee_id: EmployeeId, raw: String },
}

/// Score output with the contribution trail and any data-quality warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub employee_id: EmployeeId,
    pub total: i32,
    pub components: Vec<ScoreComponent>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Recompute the transient score from the live record collections.
///
/// Records belonging to other employees are ignored, so callers may pass
/// unfiltered collections. The total is not clamped.
pub fn compute_score(
    employee: &Employee,
    histories: &[HistoryEvent],
    sanctions: &[Sanction],
    evaluations: &[Evaluation],
    inspections: &[Inspection],
) -> i32 {
    score_breakdown(employee, histories, sanctions, evaluations, inspections).total
}

pub fn score_breakdown(
    employee: &Employee,
    histories: &[HistoryEvent],
    sanctions: &[Sanction],
    evaluations: &[Evaluation],
    inspections: &[Inspection],
) -> ScoreBreakdown {
    let (components, total, warnings) =
        rules::score_records(employee, histories, sanctions, evaluations, inspections);

    for warning in &warnings {
        warn!(%warning, "record ignored while scoring");
    }

    ScoreBreakdown {
        employee_id: employee.id.clone(),
        total,
        components,
        warnings,
    }
}

impl EmployeeRecords {
    pub fn breakdown_for(&self, employee: &Employee) -> ScoreBreakdown {
        score_breakdown(
            employee,
            &self.histories,
            &self.sanctions,
            &self.evaluations,
            &self.inspections,
        )
    }

    pub fn score_for(&self, employee: &Employee) -> i32 {
        self.breakdown_for(employee).total
    }
}
