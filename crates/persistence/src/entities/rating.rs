//! Rating and rating reply entities.

use chrono::{DateTime, Utc};
use domain::models::{Rating, RatingReply};
use sqlx::FromRow;

/// Database entity for ratings.
#[derive(Debug, Clone, FromRow)]
pub struct RatingEntity {
    pub id: i64,
    pub candidate_id: i64,
    pub citizen_id: i64,
    pub stars: i32,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl From<RatingEntity> for Rating {
    fn from(e: RatingEntity) -> Self {
        Rating {
            id: e.id,
            candidate_id: e.candidate_id,
            citizen_id: e.citizen_id,
            stars: e.stars,
            comment: e.comment,
            timestamp: e.timestamp,
            is_read: e.is_read,
        }
    }
}

/// Database entity for rating replies.
#[derive(Debug, Clone, FromRow)]
pub struct RatingReplyEntity {
    pub id: i64,
    pub rating_id: i64,
    pub candidate_id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<RatingReplyEntity> for RatingReply {
    fn from(e: RatingReplyEntity) -> Self {
        RatingReply {
            id: e.id,
            rating_id: e.rating_id,
            candidate_id: e.candidate_id,
            content: e.content,
            timestamp: e.timestamp,
        }
    }
}
