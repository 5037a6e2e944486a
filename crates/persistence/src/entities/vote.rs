//! Vote entity.

use chrono::{DateTime, Utc};
use domain::models::{Vote, VoteType};
use sqlx::FromRow;
use std::str::FromStr;

/// Database entity for votes.
#[derive(Debug, Clone, FromRow)]
pub struct VoteEntity {
    pub id: i64,
    pub candidate_id: i64,
    pub citizen_id: i64,
    pub vote_type: String,
    pub timestamp: DateTime<Utc>,
}

impl From<VoteEntity> for Vote {
    fn from(e: VoteEntity) -> Self {
        Vote {
            id: e.id,
            candidate_id: e.candidate_id,
            citizen_id: e.citizen_id,
            // the column carries a CHECK constraint, so this always parses
            vote_type: VoteType::from_str(&e.vote_type).unwrap_or(VoteType::Approve),
            timestamp: e.timestamp,
        }
    }
}
