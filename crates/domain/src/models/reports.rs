//! Report and dashboard aggregate types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::governorates::Governorate;

/// Site-wide totals shown on the admin dashboard.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_candidates: i64,
    pub total_messages: i64,
    pub total_ratings: i64,
    pub total_votes: i64,
    pub total_news: i64,
}

/// Activity counted inside a reporting window.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub new_users: i64,
    pub active_users: i64,
    pub new_messages: i64,
    pub new_ratings: i64,
    pub new_votes: i64,
}

/// A candidate ranked by engagement in the reports views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCandidate {
    pub id: i64,
    pub name: String,
    pub governorate_name: &'static str,
    pub total_messages: i64,
    pub total_ratings: i64,
    pub total_votes: i64,
    pub avg_rating: f64,
    pub total_engagement: i64,
}

/// Candidate count for one governorate (chart + report feed).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorateCount {
    pub name: &'static str,
    pub count: i64,
}

/// Per-governorate statistics for the governorates listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorateStats {
    pub governorate: Governorate,
    pub total_candidates: i64,
    pub total_citizens: i64,
    pub total_messages: i64,
    pub total_votes: i64,
    pub total_ratings: i64,
    pub total_activity: i64,
    pub avg_rating: f64,
}

/// Sort keys for the governorates listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernorateSort {
    #[default]
    Name,
    CandidatesCount,
    Activity,
}

impl FromStr for GovernorateSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(GovernorateSort::Name),
            "candidates_count" => Ok(GovernorateSort::CandidatesCount),
            "activity" => Ok(GovernorateSort::Activity),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// Health grade derived from the recent error count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemHealth {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl SystemHealth {
    /// Grades the error count in the reporting window.
    pub fn from_error_count(recent_errors: i64) -> Self {
        match recent_errors {
            0 => SystemHealth::Excellent,
            1..=4 => SystemHealth::Good,
            5..=19 => SystemHealth::Warning,
            _ => SystemHealth::Critical,
        }
    }
}

/// One day on the daily-activity chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub count: i64,
}

/// A labelled engagement window in the user-engagement report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementWindow {
    pub label: &'static str,
    pub days: i64,
    pub stats: PeriodStats,
}

/// The windows the user-engagement report covers.
pub const ENGAGEMENT_WINDOWS: [(&str, i64); 4] = [
    ("اليوم", 1),
    ("الأسبوع", 7),
    ("الشهر", 30),
    ("الثلاثة أشهر", 90),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_health_thresholds() {
        assert_eq!(SystemHealth::from_error_count(0), SystemHealth::Excellent);
        assert_eq!(SystemHealth::from_error_count(1), SystemHealth::Good);
        assert_eq!(SystemHealth::from_error_count(4), SystemHealth::Good);
        assert_eq!(SystemHealth::from_error_count(5), SystemHealth::Warning);
        assert_eq!(SystemHealth::from_error_count(19), SystemHealth::Warning);
        assert_eq!(SystemHealth::from_error_count(20), SystemHealth::Critical);
    }

    #[test]
    fn test_governorate_sort_parse() {
        assert_eq!(
            GovernorateSort::from_str("candidates_count").unwrap(),
            GovernorateSort::CandidatesCount
        );
        assert_eq!(GovernorateSort::default(), GovernorateSort::Name);
        assert!(GovernorateSort::from_str("population").is_err());
    }

    #[test]
    fn test_engagement_windows_cover_quarter() {
        assert_eq!(ENGAGEMENT_WINDOWS.len(), 4);
        assert_eq!(ENGAGEMENT_WINDOWS[3].1, 90);
    }
}
