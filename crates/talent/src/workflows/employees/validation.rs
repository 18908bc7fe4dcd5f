use super::domain::EmployeeStatus;
use super::lifecycle::PendingRequirement;

/// Rejections raised before any record is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unrecognized event kind '{0}' (expected positivo, neutro or negativo)")]
    UnknownEventKind(String),
    #[error("employee already has {limit} positive/negative records in {month}")]
    MonthlyLimitReached { limit: usize, month: String },
    #[error("status {status} requires {requirement}")]
    MissingRequirement {
        status: EmployeeStatus,
        requirement: PendingRequirement,
    },
    #[error("status {0} is terminal and cannot be changed")]
    TerminalStatus(EmployeeStatus),
    #[error("employee cannot be highlighted: {0}")]
    NotEligible(String),
    #[error("an employee named '{0}' already exists")]
    DuplicateName(String),
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

pub(crate) fn require_text(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_range(
    value: i64,
    field: &'static str,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
