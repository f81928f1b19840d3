//! `GET /api/code-quality`: review coverage, turnaround and PR size.

use endurance_core::math::{mean, percent, round2};
use endurance_core::normalize::{field_integer, field_number, field_text};
use endurance_stores::{ClickHouseStore, Row};
use serde::Serialize;

use crate::{MetricsError, Outcome, Window};

/// Average coverage a service needs to count as compliant.
pub const COVERAGE_THRESHOLD: f64 = 80.0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectQuality {
    project_id: String,
    reviews: i64,
    avg_coverage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CodeQualityPayload {
    avg_coverage: f64,
    avg_review_hours: f64,
    avg_pr_size: f64,
    total_reviews: i64,
    compliance_score: f64,
    by_project: Vec<ProjectQuality>,
}

fn query() -> String {
    format!(
        "SELECT project_id, \
                count() AS reviews, \
                avg(JSONExtractFloat(metadata, 'coverage')) AS avg_coverage, \
                sum(JSONExtractFloat(metadata, 'review_hours')) AS review_hours, \
                sum(JSONExtractFloat(metadata, 'lines_changed')) AS lines_changed \
         FROM events \
         WHERE event_type = 'code_review' AND {} \
         GROUP BY project_id \
         ORDER BY project_id",
        Window::FILTER
    )
}

/// # Errors
///
/// Returns [`MetricsError`] if the query fails.
pub async fn load(
    store: &ClickHouseStore,
    window: &Window,
    services_count: u32,
) -> Result<Outcome, MetricsError> {
    let params = window.params();
    let rows = store.query(&query(), &params).await?;
    compose(&rows, services_count)
}

/// Overall averages are weighted by review count.
///
/// # Errors
///
/// Returns [`MetricsError::Encode`] if the payload fails to serialize.
pub fn compose(rows: &[Row], services_count: u32) -> Result<Outcome, MetricsError> {
    let mut total_reviews = 0_i64;
    let mut coverage_weighted = 0.0;
    let mut review_hours = 0.0;
    let mut lines_changed = 0.0;
    let mut compliant = 0_u32;
    let mut by_project = Vec::with_capacity(rows.len());

    for row in rows {
        let reviews = field_integer(row, "reviews");
        if reviews <= 0 {
            continue;
        }
        let avg_coverage = field_number(row, "avg_coverage");
        total_reviews += reviews;
        #[allow(clippy::cast_precision_loss)]
        {
            coverage_weighted += avg_coverage * reviews as f64;
        }
        review_hours += field_number(row, "review_hours");
        lines_changed += field_number(row, "lines_changed");
        if avg_coverage >= COVERAGE_THRESHOLD {
            compliant += 1;
        }
        by_project.push(ProjectQuality {
            project_id: field_text(row, "project_id"),
            reviews,
            avg_coverage: round2(avg_coverage),
        });
    }
    if total_reviews == 0 {
        return Ok(Outcome::Empty);
    }

    let count = total_reviews.unsigned_abs();
    Outcome::live(&CodeQualityPayload {
        avg_coverage: round2(mean(coverage_weighted, count)),
        avg_review_hours: round2(mean(review_hours, count)),
        avg_pr_size: round2(mean(lines_changed, count)),
        total_reviews,
        compliance_score: percent(f64::from(compliant), f64::from(services_count)).min(100.0),
        by_project,
    })
}
