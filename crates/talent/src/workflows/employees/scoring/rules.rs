use super::super::domain::{
    Employee, EmployeeStatus, Evaluation, HistoryEvent, HistoryKind, Inspection, Sanction,
    SanctionKind,
};
use super::{DataQualityWarning, ScoreComponent, ScoreSource};

pub(crate) const BASE_SCORE: i32 = 10;
pub(crate) const HIGHLIGHT_BONUS: i32 = 10;

pub(crate) fn history_delta(kind: &HistoryKind) -> Option<i32> {
    match kind {
        HistoryKind::Positive => Some(5),
        HistoryKind::Negative => Some(-10),
        HistoryKind::Absence => Some(-5),
        HistoryKind::Neutral => Some(0),
        HistoryKind::Other(_) => None,
    }
}

pub(crate) fn sanction_delta(kind: &SanctionKind) -> Option<i32> {
    match kind {
        SanctionKind::Warning | SanctionKind::SuspensionOneDay => Some(-10),
        SanctionKind::SuspensionThreeDays => Some(-20),
        SanctionKind::SuspensionFivePlusDays => Some(-50),
        SanctionKind::Other(_) => None,
    }
}

/// Integer division truncates toward zero before the contribution is added.
pub(crate) fn rating_delta(score: Option<i32>) -> i32 {
    score.unwrap_or(0) / 10
}

pub(crate) fn score_records(
    employee: &Employee,
    histories: &[HistoryEvent],
    sanctions: &[Sanction],
    evaluations: &[Evaluation],
    inspections: &[Inspection],
) -> (Vec<ScoreComponent>, i32, Vec<DataQualityWarning>) {
    let mut components = Vec::new();
    let mut warnings = Vec::new();
    let mut total = BASE_SCORE;

    for event in histories
        .iter()
        .filter(|event| event.employee_id == employee.id)
    {
        match history_delta(&event.kind) {
            Some(delta) => {
                total = total.saturating_add(delta);
                components.push(ScoreComponent {
                    source: ScoreSource::History,
                    points: delta,
                    notes: format!("{} event on {}", event.kind.label(), event.date),
                });
            }
            None => warnings.push(DataQualityWarning::UnknownHistoryKind {
                employee_id: employee.id.clone(),
                raw: event.kind.label().to_string(),
            }),
        }
    }

    for sanction in sanctions
        .iter()
        .filter(|sanction| sanction.employee_id == employee.id)
    {
        match sanction_delta(&sanction.kind) {
            Some(delta) => {
                total = total.saturating_add(delta);
                components.push(ScoreComponent {
                    source: ScoreSource::Sanction,
                    points: delta,
                    notes: format!("sanction {}", sanction.kind.label()),
                });
            }
            None => warnings.push(DataQualityWarning::UnknownSanctionKind {
                employee_id: employee.id.clone(),
                raw: sanction.kind.label().to_string(),
            }),
        }
    }

    for evaluation in evaluations
        .iter()
        .filter(|evaluation| evaluation.employee_id == employee.id)
    {
        let delta = rating_delta(evaluation.score);
        total = total.saturating_add(delta);
        components.push(ScoreComponent {
            source: ScoreSource::Evaluation,
            points: delta,
            notes: format!("evaluation {}%", evaluation.score.unwrap_or(0)),
        });
    }

    for inspection in inspections
        .iter()
        .filter(|inspection| inspection.employee_id == employee.id)
    {
        let delta = rating_delta(inspection.score);
        total = total.saturating_add(delta);
        components.push(ScoreComponent {
            source: ScoreSource::Inspection,
            points: delta,
            notes: format!("inspection {}%", inspection.score.unwrap_or(0)),
        });
    }

    if employee.status == EmployeeStatus::Highlighted {
        total = total.saturating_add(HIGHLIGHT_BONUS);
        components.push(ScoreComponent {
            source: ScoreSource::HighlightBonus,
            points: HIGHLIGHT_BONUS,
            notes: "highlight bonus".to_string(),
        });
    }

    (components, total, warnings)
}
