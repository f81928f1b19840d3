//! Route identifiers.
//!
//! Every HTTP route that can degrade to a fallback payload has an
//! [`Endpoint`]. The identifier decides which discriminator key the response
//! carries and which HTTP status a backend failure maps to.

use std::fmt;

/// Which boolean/string key leads a response object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminator {
    /// `hasData: true|false`: store-backed dashboard routes.
    HasData,
    /// `status: "success"|"error"`: AI relay routes.
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Employees,
    Sprints,
    Pipelines,
    Dora,
    CodeQuality,
    Collaboration,
    Skills,
    Blockers,
    Financials,
    AiSearch,
    Anomalies,
    ExpertsFind,
    Message,
    OneOnOnePrep,
    DoraAnalysis,
    WeeklyReport,
    RiskReport,
    AiRecommendations,
}

impl Endpoint {
    pub const ALL: [Self; 18] = [
        Self::Employees,
        Self::Sprints,
        Self::Pipelines,
        Self::Dora,
        Self::CodeQuality,
        Self::Collaboration,
        Self::Skills,
        Self::Blockers,
        Self::Financials,
        Self::AiSearch,
        Self::Anomalies,
        Self::ExpertsFind,
        Self::Message,
        Self::OneOnOnePrep,
        Self::DoraAnalysis,
        Self::WeeklyReport,
        Self::RiskReport,
        Self::AiRecommendations,
    ];

    /// Route path relative to the server root.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Employees => "/api/employees",
            Self::Sprints => "/api/sprints",
            Self::Pipelines => "/api/pipelines",
            Self::Dora => "/api/dora",
            Self::CodeQuality => "/api/code-quality",
            Self::Collaboration => "/api/collaboration",
            Self::Skills => "/api/skills",
            Self::Blockers => "/api/blockers",
            Self::Financials => "/api/financials",
            Self::AiSearch => "/api/ai-search",
            Self::Anomalies => "/api/anomalies",
            Self::ExpertsFind => "/api/experts/find",
            Self::Message => "/api/message",
            Self::OneOnOnePrep => "/api/prep/1on1",
            Self::DoraAnalysis => "/api/metrics/dora",
            Self::WeeklyReport => "/api/reports/weekly",
            Self::RiskReport => "/api/reports/risks",
            Self::AiRecommendations => "/api/ai-recommendations",
        }
    }

    /// Short name used in log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Sprints => "sprints",
            Self::Pipelines => "pipelines",
            Self::Dora => "dora",
            Self::CodeQuality => "code_quality",
            Self::Collaboration => "collaboration",
            Self::Skills => "skills",
            Self::Blockers => "blockers",
            Self::Financials => "financials",
            Self::AiSearch => "ai_search",
            Self::Anomalies => "anomalies",
            Self::ExpertsFind => "experts_find",
            Self::Message => "message",
            Self::OneOnOnePrep => "prep_1on1",
            Self::DoraAnalysis => "dora_analysis",
            Self::WeeklyReport => "weekly_report",
            Self::RiskReport => "risk_report",
            Self::AiRecommendations => "ai_recommendations",
        }
    }

    #[must_use]
    pub const fn discriminator(self) -> Discriminator {
        match self {
            Self::Employees
            | Self::Sprints
            | Self::Pipelines
            | Self::Dora
            | Self::CodeQuality
            | Self::Collaboration
            | Self::Skills
            | Self::Blockers
            | Self::Financials => Discriminator::HasData,
            Self::AiSearch
            | Self::Anomalies
            | Self::ExpertsFind
            | Self::Message
            | Self::OneOnOnePrep
            | Self::DoraAnalysis
            | Self::WeeklyReport
            | Self::RiskReport
            | Self::AiRecommendations => Discriminator::Status,
        }
    }

    /// HTTP status code used when the backing store or upstream service fails.
    ///
    /// Everything degrades with 200 except the two routes whose callers
    /// expect a hard failure signal.
    #[must_use]
    pub const fn failure_status(self) -> u16 {
        match self {
            Self::Financials => 500,
            Self::Anomalies => 502,
            _ => 200,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn paths_are_unique() {
        let paths: HashSet<_> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        assert_eq!(paths.len(), Endpoint::ALL.len());
    }

    #[test]
    fn only_two_routes_fail_hard() {
        let hard: Vec<_> = Endpoint::ALL
            .iter()
            .filter(|e| e.failure_status() != 200)
            .copied()
            .collect();
        assert_eq!(hard, vec![Endpoint::Financials, Endpoint::Anomalies]);
    }

    #[test]
    fn relay_routes_use_status_discriminator() {
        assert_eq!(Endpoint::Sprints.discriminator(), Discriminator::HasData);
        assert_eq!(Endpoint::Message.discriminator(), Discriminator::Status);
        assert_eq!(Endpoint::RiskReport.discriminator(), Discriminator::Status);
    }
}
