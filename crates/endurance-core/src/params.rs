//! Query parameter validation for dashboard routes.
//!
//! Values accepted here are still bound as query parameters downstream; the
//! checks only reject input the dashboard never produces.

use chrono::{Duration, NaiveDate};

use crate::errors::CoreError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_PROJECT_LEN: usize = 64;

/// Inclusive calendar-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Parse optional `from`/`to` (`YYYY-MM-DD`).
    ///
    /// A missing `to` defaults to `today`; a missing `from` defaults to
    /// `default_days` days ending at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidParam`] for malformed dates or `from > to`.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
        default_days: u32,
    ) -> Result<Self, CoreError> {
        let to = match non_blank(to) {
            Some(raw) => parse_date("to", raw)?,
            None => today,
        };
        let from = match non_blank(from) {
            Some(raw) => parse_date("from", raw)?,
            None => to - Duration::days(i64::from(default_days.max(1)) - 1),
        };
        if from > to {
            return Err(CoreError::invalid("from", format!("{from} is after {to}")));
        }
        Ok(Self { from, to })
    }

    /// Number of calendar days covered, at least 1.
    #[must_use]
    pub fn days(&self) -> i64 {
        ((self.to - self.from).num_days() + 1).max(1)
    }

    /// Inclusive lower bound as a `DateTime` literal.
    #[must_use]
    pub fn start(&self) -> String {
        format!("{} 00:00:00", self.from.format(DATE_FORMAT))
    }

    /// Exclusive upper bound (midnight after `to`).
    #[must_use]
    pub fn end_exclusive(&self) -> String {
        let next = self.to + Duration::days(1);
        format!("{} 00:00:00", next.format(DATE_FORMAT))
    }
}

/// Validate a project identifier against the allow-list.
///
/// An empty allow-list accepts any id made of ASCII alphanumerics, `-` and `_`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidParam`] if the id is malformed or not allowed.
pub fn validate_project(project: &str, allowed: &[String]) -> Result<(), CoreError> {
    let well_formed = !project.is_empty()
        && project.len() <= MAX_PROJECT_LEN
        && project
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !well_formed {
        return Err(CoreError::invalid("project", "malformed project id"));
    }
    if !allowed.is_empty() && !allowed.iter().any(|p| p == project) {
        return Err(CoreError::invalid(
            "project",
            format!("'{project}' is not a tracked project"),
        ));
    }
    Ok(())
}

/// Require a non-blank string field, returning it trimmed.
///
/// # Errors
///
/// Returns [`CoreError::MissingField`] when absent or blank.
pub fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, CoreError> {
    non_blank(value).ok_or_else(|| CoreError::MissingField(field.to_string()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| CoreError::invalid(field, format!("'{raw}' is not a YYYY-MM-DD date")))
}
