//! Candidate entity, alone and joined with its aggregated statistics.

use chrono::{DateTime, Utc};
use domain::models::{Candidate, CandidateStats};
use sqlx::FromRow;

/// Database entity for candidate profiles.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateEntity {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
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

impl From<CandidateEntity> for Candidate {
    fn from(e: CandidateEntity) -> Self {
        Candidate {
            id: e.id,
            account_id: e.account_id,
            name: e.name,
            role: e.role,
            governorate_id: e.governorate_id,
            constituency: e.constituency,
            profile_picture: e.profile_picture,
            banner_image: e.banner_image,
            bio: e.bio,
            electoral_program: e.electoral_program,
            message_to_voters: e.message_to_voters,
            youtube_video_url: e.youtube_video_url,
            facebook_url: e.facebook_url,
            twitter_url: e.twitter_url,
            website_url: e.website_url,
            phone_number: e.phone_number,
            is_featured: e.is_featured,
            election_symbol: e.election_symbol,
            election_number: e.election_number,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Candidate row with engagement aggregates computed in the same query.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateWithStatsEntity {
    #[sqlx(flatten)]
    pub candidate: CandidateEntity,
    pub total_votes: i64,
    pub approve_votes: i64,
    pub disapprove_votes: i64,
    pub avg_rating: f64,
    pub total_ratings: i64,
    pub total_messages: i64,
}

impl CandidateWithStatsEntity {
    pub fn into_parts(self) -> (Candidate, CandidateStats) {
        let stats = CandidateStats {
            total_votes: self.total_votes,
            approve_votes: self.approve_votes,
            disapprove_votes: self.disapprove_votes,
            // one decimal place, as displayed
            avg_rating: (self.avg_rating * 10.0).round() / 10.0,
            total_ratings: self.total_ratings,
            total_messages: self.total_messages,
            total_activity: self.total_votes + self.total_ratings + self.total_messages,
        };
        (self.candidate.into(), stats)
    }
}
