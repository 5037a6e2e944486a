//! Electoral promise and service history repository.

use domain::models::{ElectoralPromise, PromiseInput, PublicServiceHistory, ServiceHistoryInput};
use sqlx::PgPool;

use crate::entities::{PromiseEntity, ServiceHistoryEntity};

const PROMISE_COLUMNS: &str =
    "id, candidate_id, title, description, display_order, created_at, updated_at";
const HISTORY_COLUMNS: &str =
    "id, candidate_id, start_year, end_year, position, description, created_at, updated_at";

/// Repository for electoral promises and public service history.
#[derive(Clone)]
pub struct PromiseRepository {
    pool: PgPool,
}

impl PromiseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a promise at the end of the candidate's list.
    pub async fn insert(
        &self,
        candidate_id: i64,
        input: &PromiseInput,
    ) -> Result<ElectoralPromise, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO electoral_promises (candidate_id, title, description, display_order)
            VALUES ($1, $2, $3,
                    (SELECT COUNT(*) + 1 FROM electoral_promises WHERE candidate_id = $1))
            RETURNING {}
            "#,
            PROMISE_COLUMNS
        );

        let entity = sqlx::query_as::<_, PromiseEntity>(&sql)
            .bind(candidate_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(entity.into())
    }

    pub async fn update(
        &self,
        id: i64,
        candidate_id: i64,
        input: &PromiseInput,
    ) -> Result<Option<ElectoralPromise>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE electoral_promises
            SET title = $3, description = $4, updated_at = now()
            WHERE id = $1 AND candidate_id = $2
            RETURNING {}
            "#,
            PROMISE_COLUMNS
        );

        let entity = sqlx::query_as::<_, PromiseEntity>(&sql)
            .bind(id)
            .bind(candidate_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// Deletes a promise, scoped to its owner.
    pub async fn delete(&self, id: i64, candidate_id: i64) -> Result<Option<ElectoralPromise>, sqlx::Error> {
        let sql = format!(
            "DELETE FROM electoral_promises WHERE id = $1 AND candidate_id = $2 RETURNING {}",
            PROMISE_COLUMNS
        );
        let entity = sqlx::query_as::<_, PromiseEntity>(&sql)
            .bind(id)
            .bind(candidate_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// A candidate's promises in display order, then creation time.
    pub async fn list_for_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<ElectoralPromise>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM electoral_promises WHERE candidate_id = $1 ORDER BY display_order, created_at",
            PROMISE_COLUMNS
        );
        let entities = sqlx::query_as::<_, PromiseEntity>(&sql)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<ElectoralPromise>, sqlx::Error> {
        let sql = format!("SELECT {} FROM electoral_promises ORDER BY id", PROMISE_COLUMNS);
        let entities = sqlx::query_as::<_, PromiseEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Adds a service-history entry.
    pub async fn insert_history(
        &self,
        candidate_id: i64,
        input: &ServiceHistoryInput,
    ) -> Result<PublicServiceHistory, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO service_history (candidate_id, start_year, end_year, position, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            HISTORY_COLUMNS
        );

        let entity = sqlx::query_as::<_, ServiceHistoryEntity>(&sql)
            .bind(candidate_id)
            .bind(input.start_year)
            .bind(input.end_year)
            .bind(&input.position)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(entity.into())
    }

    pub async fn delete_history(
        &self,
        id: i64,
        candidate_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM service_history WHERE id = $1 AND candidate_id = $2",
        )
        .bind(id)
        .bind(candidate_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// A candidate's service history, most recent first.
    pub async fn history_for_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<PublicServiceHistory>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM service_history WHERE candidate_id = $1 ORDER BY start_year DESC",
            HISTORY_COLUMNS
        );
        let entities = sqlx::query_as::<_, ServiceHistoryEntity>(&sql)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn history_all(&self) -> Result<Vec<PublicServiceHistory>, sqlx::Error> {
        let sql = format!("SELECT {} FROM service_history ORDER BY id", HISTORY_COLUMNS);
        let entities = sqlx::query_as::<_, ServiceHistoryEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
