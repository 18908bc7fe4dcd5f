use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::{Employee, EmployeeRecords, EmployeeStatus};

/// Longest highlight window a policy may configure.
pub const MAX_HIGHLIGHT_DURATION_DAYS: i64 = 366;

/// Limits gating the `Destaque` status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightPolicy {
    pub max_concurrent: usize,
    pub min_score: i32,
    pub min_tenure_days: i64,
    pub max_streak: u32,
    pub duration_days: i64,
}

impl Default for HighlightPolicy {
    fn default() -> Self {
        Self {
            max_concurrent: 2,
            min_score: 30,
            min_tenure_days: 90,
            max_streak: 3,
            duration_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HighlightEligibility {
    Eligible,
    Ineligible { reason: String },
}

impl HighlightEligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, HighlightEligibility::Eligible)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            HighlightEligibility::Eligible => None,
            HighlightEligibility::Ineligible { reason } => Some(reason),
        }
    }
}

/// Check whether `employee` may enter `Destaque`. The first failing rule wins.
pub fn can_be_highlighted(
    employee: &Employee,
    all_employees: &[Employee],
    records: &EmployeeRecords,
    policy: &HighlightPolicy,
    now: DateTime<Utc>,
) -> HighlightEligibility {
    let one_year_ago = now.checked_sub_months(Months::new(12)).unwrap_or(now);
    let recent_streak = match employee.highlight.last_highlighted_at {
        Some(last) if last >= one_year_ago => employee.highlight.streak,
        _ => 0,
    };
    if recent_streak >= policy.max_streak {
        return HighlightEligibility::Ineligible {
            reason: format!(
                "already highlighted {recent_streak} times in the last 12 months (limit {})",
                policy.max_streak
            ),
        };
    }

    let highlighted = all_employees
        .iter()
        .filter(|other| other.status == EmployeeStatus::Highlighted)
        .count();
    if highlighted >= policy.max_concurrent {
        return HighlightEligibility::Ineligible {
            reason: format!(
                "{highlighted} employees are already highlighted; simultaneous highlight limit is {}",
                policy.max_concurrent
            ),
        };
    }

    let score = records.score_for(employee);
    if score < policy.min_score {
        return HighlightEligibility::Ineligible {
            reason: format!(
                "insufficient score ({score} points, minimum {})",
                policy.min_score
            ),
        };
    }

    let tenure_days = (now.date_naive() - employee.admission_date).num_days();
    if tenure_days < policy.min_tenure_days {
        return HighlightEligibility::Ineligible {
            reason: format!(
                "insufficient tenure ({tenure_days} days, minimum {})",
                policy.min_tenure_days
            ),
        };
    }

    HighlightEligibility::Eligible
}
