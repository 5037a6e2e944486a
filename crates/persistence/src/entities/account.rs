//! Account entity.

use chrono::{DateTime, Utc};
use domain::models::Account;
use sqlx::FromRow;

/// Database entity for accounts.
#[derive(Debug, Clone, FromRow)]
pub struct AccountEntity {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<AccountEntity> for Account {
    fn from(e: AccountEntity) -> Self {
        Account {
            id: e.id,
            username: e.username,
            email: e.email,
            password_hash: e.password_hash,
            first_name: e.first_name,
            last_name: e.last_name,
            is_staff: e.is_staff,
            is_active: e.is_active,
            date_joined: e.date_joined,
            last_login: e.last_login,
        }
    }
}

/// Account row joined with profile-existence flags, used by the admin
/// user listing to resolve each account's role in one query.
#[derive(Debug, Clone, FromRow)]
pub struct AccountWithRoleEntity {
    #[sqlx(flatten)]
    pub account: AccountEntity,
    pub has_candidate_profile: bool,
    pub has_citizen_profile: bool,
}
