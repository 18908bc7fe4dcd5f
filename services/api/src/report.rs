use crate::infra::{InMemoryAlertPublisher, InMemoryEmployeeRepository};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use talent::config::AppConfig;
use talent::error::AppError;
use talent::workflows::employees::{
    DeadlineAlert, EmployeeService, EmployeeStatus, FixedClock, HighlightEligibility,
    HighlightPolicy,
};
use talent::workflows::snapshot::{EmployeeSnapshot, SnapshotImporter};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON export of the employee tables
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Evaluation date for the report (defaults to today, UTC)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SnapshotReport {
    pub(crate) today: NaiveDate,
    pub(crate) ranking: Vec<RankingEntry>,
    pub(crate) alerts: Vec<DeadlineAlert>,
    pub(crate) warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankingEntry {
    pub(crate) employee_id: String,
    pub(crate) name: String,
    pub(crate) status: EmployeeStatus,
    pub(crate) score: i32,
    pub(crate) points: i32,
    pub(crate) highlight: HighlightEligibility,
}

pub(crate) fn run_snapshot_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        snapshot,
        today,
        json,
    } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let snapshot = SnapshotImporter::from_path(&snapshot)?;
    let report = build_report(snapshot, today, config.highlight)?;

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(err) => eprintln!("could not serialize report: {err}"),
        }
    } else {
        render_report(&report);
    }
    Ok(())
}

/// Score, eligibility and alert state for every employee in the snapshot as of `today`.
pub(crate) fn build_report(
    snapshot: EmployeeSnapshot,
    today: NaiveDate,
    policy: HighlightPolicy,
) -> Result<SnapshotReport, AppError> {
    let clock = FixedClock(Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN)));
    let repository = Arc::new(InMemoryEmployeeRepository::from_snapshot(snapshot));
    let service = EmployeeService::with_clock(
        repository,
        Arc::new(InMemoryAlertPublisher::default()),
        policy,
        Arc::new(clock),
    );

    let mut ranking = Vec::new();
    let mut warnings = Vec::new();
    for view in service.search(None)? {
        warnings.extend(view.score.warnings.iter().map(ToString::to_string));
        ranking.push(RankingEntry {
            highlight: service.highlight_eligibility(&view.employee.id)?,
            employee_id: view.employee.id.0,
            name: view.employee.name,
            status: view.employee.status,
            score: view.score.total,
            points: view.employee.points,
        });
    }
    ranking.sort_by(|left, right| {
        right
            .score
            .cmp(&left.score)
            .then_with(|| left.name.cmp(&right.name))
    });

    let mut alerts = service.due_alerts()?;
    alerts.sort_by_key(|alert| alert.days_remaining);

    Ok(SnapshotReport {
        today,
        ranking,
        alerts,
        warnings,
    })
}

fn render_report(report: &SnapshotReport) {
    println!("Employee score report as of {}", report.today);
    println!("\nRanking");
    for (position, entry) in report.ranking.iter().enumerate() {
        let highlight = match &entry.highlight {
            HighlightEligibility::Eligible => "eligible for Destaque".to_string(),
            HighlightEligibility::Ineligible { reason } => format!("not eligible: {reason}"),
        };
        println!(
            "  {:>2}. {} [{}] score {} | points {} | {}",
            position + 1,
            entry.name,
            entry.status,
            entry.score,
            entry.points,
            highlight
        );
    }

    if report.alerts.is_empty() {
        println!("\nNo status deadlines within the alert window.");
    } else {
        println!("\nDeadline alerts");
        for alert in &report.alerts {
            let name = alert
                .details
                .get("name")
                .map(String::as_str)
                .unwrap_or_else(|| alert.employee_id.0.as_str());
            println!(
                "  - {} ({}) ends {} ({} days)",
                name, alert.status, alert.deadline, alert.days_remaining
            );
        }
    }

    if !report.warnings.is_empty() {
        println!("\nData quality warnings");
        for warning in &report.warnings {
            println!("  - {warning}");
        }
    }
}
