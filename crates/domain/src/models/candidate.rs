//! Candidate profile models and list-query types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::governorates;
use crate::models::RatingDistribution;

/// A parliamentary candidate, one-to-one with an [`super::Account`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    /// Position title, e.g. "مرشح مجلس النواب".
    pub role: String,
    pub governorate_id: i32,
    pub constituency: String,
    pub profile_picture: Option<String>,
    pub banner_image: Option<String>,
    pub bio: String,
    pub electoral_program: String,
    pub message_to_voters: String,
    pub youtube_video_url: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub website_url: String,
    pub phone_number: String,
    pub is_featured: bool,
    pub election_symbol: String,
    pub election_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Governorate display name, derived from the static table.
    pub fn governorate_name(&self) -> &'static str {
        governorates::name_ar(self.governorate_id)
    }
}

/// Default position title for new candidates.
pub const DEFAULT_CANDIDATE_ROLE: &str = "مرشح مجلس النواب";

/// Engagement statistics for one candidate, aggregated over the full
/// filtered set before any page is cut.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStats {
    pub total_votes: i64,
    pub approve_votes: i64,
    pub disapprove_votes: i64,
    pub avg_rating: f64,
    pub total_ratings: i64,
    pub total_messages: i64,
    pub total_activity: i64,
}

impl CandidateStats {
    pub fn approval_percentage(&self) -> f64 {
        if self.total_votes == 0 {
            0.0
        } else {
            (self.approve_votes as f64 / self.total_votes as f64 * 1000.0).round() / 10.0
        }
    }
}

/// A candidate with their aggregated statistics, as shown on list pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWithStats {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub governorate_name: &'static str,
    pub stats: CandidateStats,
}

impl From<(Candidate, CandidateStats)> for CandidateWithStats {
    fn from((candidate, stats): (Candidate, CandidateStats)) -> Self {
        let governorate_name = candidate.governorate_name();
        Self {
            candidate,
            governorate_name,
            stats,
        }
    }
}

/// Sort keys for candidate listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSort {
    /// Ascending by name.
    #[default]
    Name,
    /// Descending by average stars.
    Rating,
    /// Descending by total vote count.
    Votes,
    /// Descending by votes + ratings + messages.
    Activity,
}

impl FromStr for CandidateSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(CandidateSort::Name),
            "rating" => Ok(CandidateSort::Rating),
            "votes" => Ok(CandidateSort::Votes),
            "activity" => Ok(CandidateSort::Activity),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

impl fmt::Display for CandidateSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CandidateSort::Name => "name",
            CandidateSort::Rating => "rating",
            CandidateSort::Votes => "votes",
            CandidateSort::Activity => "activity",
        };
        write!(f, "{}", s)
    }
}

/// Query parameters for the candidate list pages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListQuery {
    pub search: Option<String>,
    pub governorate_id: Option<i32>,
    #[serde(default)]
    pub sort: CandidateSort,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Candidates per list page.
pub const CANDIDATES_PER_PAGE: i64 = 12;

/// Admin payload creating an account and candidate profile together.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidateInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub candidate_name: String,
    pub governorate_id: i32,
    pub constituency: String,
    #[serde(default)]
    pub election_number: String,
    #[serde(default)]
    pub election_symbol: String,
}

/// Candidate-editable profile fields; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidateInput {
    pub name: Option<String>,
    pub constituency: Option<String>,
    pub bio: Option<String>,
    pub electoral_program: Option<String>,
    pub message_to_voters: Option<String>,
    pub youtube_video_url: Option<String>,
    pub facebook_url: Option<String>,
    pub twitter_url: Option<String>,
    pub website_url: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub banner_image: Option<String>,
    pub election_symbol: Option<String>,
    pub election_number: Option<String>,
}

/// Detail-page payload: candidate, statistics, and rating breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub governorate_name: &'static str,
    pub stats: CandidateStats,
    pub rating_distribution: RatingDistribution,
}

/// Autocomplete search hit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSearchHit {
    pub id: i64,
    pub name: String,
    pub constituency: String,
    pub governorate_name: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_round_trip() {
        for sort in [
            CandidateSort::Name,
            CandidateSort::Rating,
            CandidateSort::Votes,
            CandidateSort::Activity,
        ] {
            assert_eq!(CandidateSort::from_str(&sort.to_string()).unwrap(), sort);
        }
        assert!(CandidateSort::from_str("popularity").is_err());
    }

    #[test]
    fn test_sort_default_is_name() {
        assert_eq!(CandidateSort::default(), CandidateSort::Name);
    }

    #[test]
    fn test_approval_percentage() {
        let stats = CandidateStats {
            total_votes: 8,
            approve_votes: 6,
            disapprove_votes: 2,
            ..Default::default()
        };
        assert_eq!(stats.approval_percentage(), 75.0);

        let empty = CandidateStats::default();
        assert_eq!(empty.approval_percentage(), 0.0);
    }

    #[test]
    fn test_candidate_governorate_name() {
        let candidate = Candidate {
            id: 1,
            account_id: 1,
            name: "مرشح تجريبي".to_string(),
            role: DEFAULT_CANDIDATE_ROLE.to_string(),
            governorate_id: 2,
            constituency: "الدقي".to_string(),
            profile_picture: None,
            banner_image: None,
            bio: String::new(),
            electoral_program: String::new(),
            message_to_voters: String::new(),
            youtube_video_url: String::new(),
            facebook_url: String::new(),
            twitter_url: String::new(),
            website_url: String::new(),
            phone_number: String::new(),
            is_featured: false,
            election_symbol: String::new(),
            election_number: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(candidate.governorate_name(), "الجيزة");
    }
}
