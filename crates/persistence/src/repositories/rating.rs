//! Rating and rating-reply repository.

use domain::models::{Rating, RatingDistribution, RatingOutcome, RatingReply};
use shared::pagination::PageWindow;
use sqlx::PgPool;

use crate::entities::{RatingEntity, RatingReplyEntity};

const RATING_COLUMNS: &str =
    "id, candidate_id, citizen_id, stars, comment, timestamp, is_read";

/// Repository for ratings.
#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or overwrites the pair's rating. Stars must already be
    /// bounds-checked; the column CHECK backs this up.
    pub async fn upsert(
        &self,
        candidate_id: i64,
        citizen_id: i64,
        stars: i32,
        comment: &str,
    ) -> Result<(Rating, RatingOutcome), sqlx::Error> {
        #[derive(sqlx::FromRow)]
        struct UpsertRow {
            #[sqlx(flatten)]
            rating: RatingEntity,
            inserted: bool,
        }

        let row = sqlx::query_as::<_, UpsertRow>(
            r#"
            INSERT INTO ratings (candidate_id, citizen_id, stars, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (candidate_id, citizen_id)
            DO UPDATE SET stars = EXCLUDED.stars, comment = EXCLUDED.comment, timestamp = now()
            RETURNING id, candidate_id, citizen_id, stars, comment, timestamp, is_read,
                      (xmax = 0) AS inserted
            "#,
        )
        .bind(candidate_id)
        .bind(citizen_id)
        .bind(stars)
        .bind(comment)
        .fetch_one(&self.pool)
        .await?;

        let outcome = if row.inserted {
            RatingOutcome::Created
        } else {
            RatingOutcome::Updated
        };

        Ok((row.rating.into(), outcome))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Rating>, sqlx::Error> {
        let sql = format!("SELECT {} FROM ratings WHERE id = $1", RATING_COLUMNS);
        let entity = sqlx::query_as::<_, RatingEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// The citizen's rating of a candidate, if any.
    pub async fn find_for_pair(
        &self,
        candidate_id: i64,
        citizen_id: i64,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM ratings WHERE candidate_id = $1 AND citizen_id = $2",
            RATING_COLUMNS
        );
        let entity = sqlx::query_as::<_, RatingEntity>(&sql)
            .bind(candidate_id)
            .bind(citizen_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// A candidate's ratings, newest first, paged.
    pub async fn list_for_candidate(
        &self,
        candidate_id: i64,
        window: PageWindow,
    ) -> Result<(Vec<Rating>, i64), sqlx::Error> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_one(&self.pool)
                .await?;

        let sql = format!(
            "SELECT {} FROM ratings WHERE candidate_id = $1 ORDER BY timestamp DESC LIMIT $2 OFFSET $3",
            RATING_COLUMNS
        );
        let entities = sqlx::query_as::<_, RatingEntity>(&sql)
            .bind(candidate_id)
            .bind(window.per_page)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Star counts for a candidate's rating breakdown.
    pub async fn distribution(&self, candidate_id: i64) -> Result<RatingDistribution, sqlx::Error> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT stars, COUNT(*) FROM ratings WHERE candidate_id = $1 GROUP BY stars",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        let mut dist = RatingDistribution::default();
        for (stars, count) in rows {
            dist.record(stars, count);
        }
        Ok(dist)
    }

    /// Marks a rating read, as happens when the candidate opens it to reply.
    pub async fn mark_read(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE ratings SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn unread_count_for_candidate(&self, candidate_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM ratings WHERE candidate_id = $1 AND NOT is_read",
        )
        .bind(candidate_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Replaces the candidate's reply to a rating: any previous reply is
    /// deleted and the new one inserted, in one transaction.
    pub async fn replace_reply(
        &self,
        rating_id: i64,
        candidate_id: i64,
        content: &str,
    ) -> Result<RatingReply, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM rating_replies WHERE rating_id = $1")
            .bind(rating_id)
            .execute(&mut *tx)
            .await?;

        let entity = sqlx::query_as::<_, RatingReplyEntity>(
            r#"
            INSERT INTO rating_replies (rating_id, candidate_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, rating_id, candidate_id, content, timestamp
            "#,
        )
        .bind(rating_id)
        .bind(candidate_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(entity.into())
    }

    pub async fn find_reply(&self, rating_id: i64) -> Result<Option<RatingReply>, sqlx::Error> {
        let entity = sqlx::query_as::<_, RatingReplyEntity>(
            "SELECT id, rating_id, candidate_id, content, timestamp FROM rating_replies WHERE rating_id = $1",
        )
        .bind(rating_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM ratings")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Rating>, sqlx::Error> {
        let sql = format!("SELECT {} FROM ratings ORDER BY id", RATING_COLUMNS);
        let entities = sqlx::query_as::<_, RatingEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
