//! Due date parsing.

use super::TaskDomainError;
use chrono::NaiveDate;

/// Parses an ISO `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] for any other format or for
/// dates that do not exist.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, TaskDomainError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TaskDomainError::InvalidDueDate(value.to_owned()))
}
