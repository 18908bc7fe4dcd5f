use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::workflows::employees::domain::{
    Employee, EmployeeId, EmployeeStatus, Evaluation, HighlightState, HistoryEvent,
    HistoryEventId, HistoryKind, Inspection, LeaveInfo, Sanction, SanctionKind, TerminationInfo,
};

/// Failure turning a raw persistence row into a domain record.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("{table} row is missing '{field}'")]
    MissingField {
        table: &'static str,
        field: &'static str,
    },
    #[error("{table}.{field} has an unreadable date '{value}'")]
    InvalidDate {
        table: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("employee {id} has an unknown status '{value}'")]
    UnknownStatus { id: String, value: String },
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEmployeeRow {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    nome: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cpf: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cargo: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    nivel: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    departamento: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    empresa: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    data_admissao: Option<String>,
    #[serde(default)]
    salario: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tipo_contrato: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, rename = "dataLimite", deserialize_with = "empty_string_as_none")]
    data_limite_camel: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    data_limite: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    data_afastamento: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    motivo_afastamento: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    data_demissao: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    motivo_demissao: Option<String>,
    #[serde(default)]
    destaque_count: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ultimo_destaque: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    destaque_inicio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    destaque_fim: Option<String>,
    #[serde(default)]
    points: Option<i32>,
}

const EMPLOYEES: &str = "employees";
const HISTORY: &str = "employee_history";
const SANCTIONS: &str = "employee_sanctions";

impl RawEmployeeRow {
    pub(crate) fn into_employee(self) -> Result<Employee, NormalizeError> {
        let status = match self.status.as_deref() {
            None => EmployeeStatus::Active,
            Some(raw) => {
                EmployeeStatus::from_label(raw).ok_or_else(|| NormalizeError::UnknownStatus {
                    id: self.id.clone(),
                    value: raw.to_string(),
                })?
            }
        };

        let admission_raw = self.data_admissao.ok_or(NormalizeError::MissingField {
            table: EMPLOYEES,
            field: "data_admissao",
        })?;
        let admission_date = parse_date(EMPLOYEES, "data_admissao", &admission_raw)?;

        // camelCase wins when both spellings carry a value
        let deadline = self
            .data_limite_camel
            .or(self.data_limite)
            .map(|raw| parse_date(EMPLOYEES, "data_limite", &raw))
            .transpose()?;

        let leave = match self.data_afastamento {
            Some(raw) => Some(LeaveInfo {
                start_date: parse_date(EMPLOYEES, "data_afastamento", &raw)?,
                reason: self.motivo_afastamento.unwrap_or_default(),
            }),
            None => None,
        };

        let termination = match self.data_demissao {
            Some(raw) => Some(TerminationInfo {
                date: parse_date(EMPLOYEES, "data_demissao", &raw)?,
                reason: self.motivo_demissao.unwrap_or_default(),
            }),
            None => None,
        };

        let highlight = HighlightState {
            streak: self.destaque_count.unwrap_or(0),
            last_highlighted_at: self
                .ultimo_destaque
                .map(|raw| parse_timestamp(EMPLOYEES, "ultimo_destaque", &raw))
                .transpose()?,
            started_at: self
                .destaque_inicio
                .map(|raw| parse_timestamp(EMPLOYEES, "destaque_inicio", &raw))
                .transpose()?,
            ends_at: self
                .destaque_fim
                .map(|raw| parse_timestamp(EMPLOYEES, "destaque_fim", &raw))
                .transpose()?,
        };

        Ok(Employee {
            id: EmployeeId(self.id),
            name: self.nome.trim().to_string(),
            tax_id: self.cpf.unwrap_or_default(),
            role: self.cargo.unwrap_or_default(),
            level: self.nivel.unwrap_or_default(),
            department: self.departamento.unwrap_or_default(),
            company: self.empresa.unwrap_or_default(),
            admission_date,
            monthly_salary_cents: self
                .salario
                .filter(|value| value.is_finite() && *value > 0.0)
                .map(|value| (value * 100.0).round() as u64),
            contract_type: self.tipo_contrato.unwrap_or_default(),
            status,
            deadline,
            leave,
            termination,
            highlight,
            points: self.points.unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHistoryRow {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(deserialize_with = "string_or_number")]
    employee_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tipo: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    event_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    data: Option<String>,
    #[serde(default)]
    descricao: String,
}

impl RawHistoryRow {
    pub(crate) fn into_event(self) -> Result<HistoryEvent, NormalizeError> {
        // A row without any kind still imports; scoring reports it as unrecognized.
        let kind = self.event_type.or(self.tipo).unwrap_or_default();
        let date_raw = self.data.ok_or(NormalizeError::MissingField {
            table: HISTORY,
            field: "data",
        })?;

        Ok(HistoryEvent {
            id: HistoryEventId(self.id),
            employee_id: EmployeeId(self.employee_id),
            kind: HistoryKind::parse(&kind),
            date: parse_date(HISTORY, "data", &date_raw)?,
            description: self.descricao,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSanctionRow {
    #[serde(deserialize_with = "string_or_number")]
    employee_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tipo: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tipo_sancao: Option<String>,
    #[serde(default, rename = "sanctionType", deserialize_with = "empty_string_as_none")]
    sanction_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    data_aplicacao: Option<String>,
}

impl RawSanctionRow {
    pub(crate) fn into_sanction(self) -> Result<Sanction, NormalizeError> {
        let kind = self
            .tipo
            .or(self.tipo_sancao)
            .or(self.sanction_type)
            .unwrap_or_default();
        Ok(Sanction {
            employee_id: EmployeeId(self.employee_id),
            kind: SanctionKind::parse(&kind),
            applied_on: self
                .data_aplicacao
                .map(|raw| parse_date(SANCTIONS, "data_aplicacao", &raw))
                .transpose()?,
        })
    }
}

/// Shared shape of evaluation and inspection rows.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRatingRow {
    #[serde(deserialize_with = "string_or_number")]
    employee_id: String,
    #[serde(default)]
    pontuacao: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    data: Option<String>,
}

impl RawRatingRow {
    fn parts(
        self,
        table: &'static str,
    ) -> Result<(EmployeeId, Option<i32>, Option<NaiveDate>), NormalizeError> {
        let date = self
            .data
            .map(|raw| parse_date(table, "data", &raw))
            .transpose()?;
        let score = self.pontuacao.map(|value| value.trunc() as i32);
        Ok((EmployeeId(self.employee_id), score, date))
    }

    pub(crate) fn into_evaluation(self) -> Result<Evaluation, NormalizeError> {
        let (employee_id, score, date) = self.parts("employee_evaluations")?;
        Ok(Evaluation {
            employee_id,
            score,
            date,
        })
    }

    pub(crate) fn into_inspection(self) -> Result<Inspection, NormalizeError> {
        let (employee_id, score, date) = self.parts("employee_inspections")?;
        Ok(Inspection {
            employee_id,
            score,
            date,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Identifiers arrive as strings or bare numbers depending on the table.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, found {other}"
        ))),
    }
}

/// Accepts plain dates and full RFC 3339 timestamps (date part kept).
fn parse_date(
    table: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<NaiveDate, NormalizeError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }
    Err(NormalizeError::InvalidDate {
        table,
        field,
        value: raw.to_string(),
    })
}

fn parse_timestamp(
    table: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<DateTime<Utc>, NormalizeError> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(NormalizeError::InvalidDate {
        table,
        field,
        value: raw.to_string(),
    })
}
