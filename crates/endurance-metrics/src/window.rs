//! Time window and project filter shared by the event-stream composers.

use endurance_core::params::DateRange;

/// Filters applied to every `events` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub range: DateRange,
    /// `None` covers every project.
    pub project: Option<String>,
}

impl Window {
    /// SQL fragment matching the filters; pair with [`params`](Self::params).
    pub const FILTER: &'static str = "timestamp >= {from:DateTime} \
         AND timestamp < {to:DateTime} \
         AND ({project:String} = '' OR project_id = {project:String})";

    #[must_use]
    pub const fn new(range: DateRange, project: Option<String>) -> Self {
        Self { range, project }
    }

    /// Bound values for the placeholders in [`FILTER`](Self::FILTER).
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("from", self.range.start()),
            ("to", self.range.end_exclusive()),
            ("project", self.project.clone().unwrap_or_default()),
        ]
    }
}
