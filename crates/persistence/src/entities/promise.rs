//! Electoral promise and service history entities.

use chrono::{DateTime, Utc};
use domain::models::{ElectoralPromise, PublicServiceHistory};
use sqlx::FromRow;

/// Database entity for electoral promises.
#[derive(Debug, Clone, FromRow)]
pub struct PromiseEntity {
    pub id: i64,
    pub candidate_id: i64,
    pub title: String,
    pub description: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PromiseEntity> for ElectoralPromise {
    fn from(e: PromiseEntity) -> Self {
        ElectoralPromise {
            id: e.id,
            candidate_id: e.candidate_id,
            title: e.title,
            description: e.description,
            order: e.display_order,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Database entity for public service history.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceHistoryEntity {
    pub id: i64,
    pub candidate_id: i64,
    pub start_year: i32,
    pub end_year: i32,
    pub position: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceHistoryEntity> for PublicServiceHistory {
    fn from(e: ServiceHistoryEntity) -> Self {
        PublicServiceHistory {
            id: e.id,
            candidate_id: e.candidate_id,
            start_year: e.start_year,
            end_year: e.end_year,
            position: e.position,
            description: e.description,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
