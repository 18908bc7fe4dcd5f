use chrono::NaiveDate;

use super::super::domain::Employee;

pub const ALERT_WINDOW_DAYS: i64 = 5;

/// Whole days from `today` to the deadline of a temporary status.
pub fn days_until_deadline(employee: &Employee, today: NaiveDate) -> Option<i64> {
    if !employee.status.has_deadline() {
        return None;
    }
    employee
        .deadline
        .map(|deadline| (deadline - today).num_days())
}

pub fn is_alert_due(employee: &Employee, today: NaiveDate) -> bool {
    days_until_deadline(employee, today)
        .map(|days| (0..=ALERT_WINDOW_DAYS).contains(&days))
        .unwrap_or(false)
}
