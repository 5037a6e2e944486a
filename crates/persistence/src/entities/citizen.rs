//! Citizen entity.

use chrono::{DateTime, Utc};
use domain::models::Citizen;
use sqlx::FromRow;

/// Database entity for citizen profiles.
#[derive(Debug, Clone, FromRow)]
pub struct CitizenEntity {
    pub id: i64,
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub governorate_id: i32,
    pub area_type: String,
    pub area_name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CitizenEntity> for Citizen {
    fn from(e: CitizenEntity) -> Self {
        Citizen {
            id: e.id,
            account_id: e.account_id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            phone_number: e.phone_number,
            governorate_id: e.governorate_id,
            area_type: e.area_type,
            area_name: e.area_name,
            address: e.address,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
