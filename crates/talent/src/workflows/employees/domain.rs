use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for employee records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for history timeline entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HistoryEventId(pub String);

impl fmt::Display for HistoryEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted point balance every new employee starts with.
pub const BASE_POINTS: i32 = 10;

/// Employment status driving the lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Em férias")]
    OnVacation,
    #[serde(rename = "Aviso prévio")]
    NoticePeriod,
    #[serde(rename = "Em Experiência")]
    Probation,
    #[serde(rename = "Em Afastamento")]
    OnLeave,
    #[serde(rename = "Destaque")]
    Highlighted,
    #[serde(rename = "INATIVO")]
    Inactive,
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 7] = [
        EmployeeStatus::Active,
        EmployeeStatus::OnVacation,
        EmployeeStatus::NoticePeriod,
        EmployeeStatus::Probation,
        EmployeeStatus::OnLeave,
        EmployeeStatus::Highlighted,
        EmployeeStatus::Inactive,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Ativo",
            EmployeeStatus::OnVacation => "Em férias",
            EmployeeStatus::NoticePeriod => "Aviso prévio",
            EmployeeStatus::Probation => "Em Experiência",
            EmployeeStatus::OnLeave => "Em Afastamento",
            EmployeeStatus::Highlighted => "Destaque",
            EmployeeStatus::Inactive => "INATIVO",
        }
    }

    /// Temporary statuses that expire on a deadline and feed alerting.
    pub const fn has_deadline(self) -> bool {
        matches!(
            self,
            EmployeeStatus::OnVacation | EmployeeStatus::NoticePeriod | EmployeeStatus::Probation
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, EmployeeStatus::Inactive)
    }

    /// Parse a stored label, tolerating case and surrounding whitespace.
    pub fn from_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label() == trimmed)
            .or_else(|| {
                let lowered = trimmed.to_lowercase();
                Self::ALL
                    .into_iter()
                    .find(|status| status.label().to_lowercase() == lowered)
            })
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Leave of absence captured when entering `Em Afastamento`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInfo {
    pub start_date: NaiveDate,
    pub reason: String,
}

/// Termination captured when entering `INATIVO`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationInfo {
    pub date: NaiveDate,
    pub reason: String,
}

/// Highlight bookkeeping. The streak survives status changes so the
/// eligibility check can see past highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightState {
    pub streak: u32,
    pub last_highlighted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// Employee record as held by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub tax_id: String,
    pub role: String,
    pub level: String,
    pub department: String,
    pub company: String,
    pub admission_date: NaiveDate,
    pub monthly_salary_cents: Option<u64>,
    pub contract_type: String,
    pub status: EmployeeStatus,
    pub deadline: Option<NaiveDate>,
    pub leave: Option<LeaveInfo>,
    pub termination: Option<TerminationInfo>,
    #[serde(default)]
    pub highlight: HighlightState,
    pub points: i32,
}

/// Payload for the "add employee" action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub tax_id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub company: String,
    pub admission_date: NaiveDate,
    #[serde(default)]
    pub monthly_salary_cents: Option<u64>,
    #[serde(default)]
    pub contract_type: String,
}

impl NewEmployee {
    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            name: self.name.trim().to_string(),
            tax_id: self.tax_id.trim().to_string(),
            role: self.role,
            level: self.level,
            department: self.department,
            company: self.company,
            admission_date: self.admission_date,
            monthly_salary_cents: self.monthly_salary_cents,
            contract_type: self.contract_type,
            status: EmployeeStatus::Active,
            deadline: None,
            leave: None,
            termination: None,
            highlight: HighlightState::default(),
            points: BASE_POINTS,
        }
    }
}

/// Kind recorded on a history timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Positive,
    Neutral,
    Negative,
    /// Legacy absence marker found in older rows; never recorded anew.
    Absence,
    Other(String),
}

impl HistoryKind {
    /// Normalize a stored kind string (trimmed, case-insensitive).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positivo" => HistoryKind::Positive,
            "neutro" => HistoryKind::Neutral,
            "negativo" => HistoryKind::Negative,
            "falta" => HistoryKind::Absence,
            _ => HistoryKind::Other(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            HistoryKind::Positive => "positivo",
            HistoryKind::Neutral => "neutro",
            HistoryKind::Negative => "negativo",
            HistoryKind::Absence => "falta",
            HistoryKind::Other(raw) => raw.as_str(),
        }
    }

    /// Kinds that count toward the monthly recording limit.
    pub fn is_rated(&self) -> bool {
        matches!(self, HistoryKind::Positive | HistoryKind::Negative)
    }
}

/// Employee timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub id: HistoryEventId,
    pub employee_id: EmployeeId,
    pub kind: HistoryKind,
    pub date: NaiveDate,
    pub description: String,
}

/// Disciplinary sanction classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanctionKind {
    Warning,
    SuspensionOneDay,
    SuspensionThreeDays,
    SuspensionFivePlusDays,
    Other(String),
}

impl SanctionKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "advertencia" | "advertência" => SanctionKind::Warning,
            "suspensao_1_dia" | "suspensão 1 dia" => SanctionKind::SuspensionOneDay,
            "suspensao_3_dias" | "suspensão 3 dias" => SanctionKind::SuspensionThreeDays,
            "suspensao_5_dias" | "suspensão 5+ dias" => SanctionKind::SuspensionFivePlusDays,
            _ => SanctionKind::Other(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SanctionKind::Warning => "advertencia",
            SanctionKind::SuspensionOneDay => "suspensao_1_dia",
            SanctionKind::SuspensionThreeDays => "suspensao_3_dias",
            SanctionKind::SuspensionFivePlusDays => "suspensao_5_dias",
            SanctionKind::Other(raw) => raw.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sanction {
    pub employee_id: EmployeeId,
    pub kind: SanctionKind,
    pub applied_on: Option<NaiveDate>,
}

/// Performance evaluation on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub score: Option<i32>,
    pub date: Option<NaiveDate>,
}

/// Field inspection on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub score: Option<i32>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub employee_id: EmployeeId,
    pub name: String,
    pub kinship: String,
    pub birth_date: Option<NaiveDate>,
    pub tax_id: Option<String>,
}

/// Metadata for an employee document; the file itself lives in external storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDocument {
    pub employee_id: EmployeeId,
    pub title: String,
    pub category: String,
    pub file_reference: Option<String>,
}

/// Snapshot of every record the score depends on for one employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecords {
    pub histories: Vec<HistoryEvent>,
    pub sanctions: Vec<Sanction>,
    pub evaluations: Vec<Evaluation>,
    pub inspections: Vec<Inspection>,
}
