//! Citizen repository.

use domain::models::{Citizen, UpdateCitizenInput};
use sqlx::PgPool;

use crate::entities::CitizenEntity;

const CITIZEN_COLUMNS: &str = "id, account_id, first_name, last_name, email, phone_number, \
                               governorate_id, area_type, area_name, address, created_at, updated_at";

/// Input for creating a citizen profile.
#[derive(Debug, Clone)]
pub struct NewCitizen {
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub governorate_id: i32,
    pub area_type: String,
    pub area_name: String,
    pub address: String,
}

/// Repository for citizen profiles.
#[derive(Clone)]
pub struct CitizenRepository {
    pool: PgPool,
}

impl CitizenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &NewCitizen,
    ) -> Result<Citizen, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO citizens (account_id, first_name, last_name, email, phone_number,
                                  governorate_id, area_type, area_name, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CITIZEN_COLUMNS
        );

        let entity = sqlx::query_as::<_, CitizenEntity>(&sql)
            .bind(input.account_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(input.governorate_id)
            .bind(&input.area_type)
            .bind(&input.area_name)
            .bind(&input.address)
            .fetch_one(&mut **tx)
            .await?;

        Ok(entity.into())
    }

    pub async fn find_by_account(&self, account_id: i64) -> Result<Option<Citizen>, sqlx::Error> {
        let sql = format!("SELECT {} FROM citizens WHERE account_id = $1", CITIZEN_COLUMNS);
        let entity = sqlx::query_as::<_, CitizenEntity>(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM citizens WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
    }

    /// All citizens whose phone number matches exactly. The quick-login
    /// name rule is applied by the caller over this candidate set.
    pub async fn find_by_phone(&self, phone_number: &str) -> Result<Vec<Citizen>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM citizens WHERE phone_number = $1 ORDER BY id",
            CITIZEN_COLUMNS
        );
        let entities = sqlx::query_as::<_, CitizenEntity>(&sql)
            .bind(phone_number)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Applies a partial profile update, leaving absent fields unchanged.
    pub async fn update_profile(
        &self,
        account_id: i64,
        input: &UpdateCitizenInput,
    ) -> Result<Option<Citizen>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE citizens SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone_number = COALESCE($4, phone_number),
                governorate_id = COALESCE($5, governorate_id),
                area_type = COALESCE($6, area_type),
                area_name = COALESCE($7, area_name),
                address = COALESCE($8, address),
                updated_at = now()
            WHERE account_id = $1
            RETURNING {}
            "#,
            CITIZEN_COLUMNS
        );

        let entity = sqlx::query_as::<_, CitizenEntity>(&sql)
            .bind(account_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(input.governorate_id)
            .bind(&input.area_type)
            .bind(&input.area_name)
            .bind(&input.address)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn count_by_governorate(&self, governorate_id: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM citizens WHERE governorate_id = $1")
            .bind(governorate_id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Citizen>, sqlx::Error> {
        let sql = format!("SELECT {} FROM citizens ORDER BY id", CITIZEN_COLUMNS);
        let entities = sqlx::query_as::<_, CitizenEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
