//! Vote repository.
//!
//! The toggle/flip decision and the row change are applied inside one
//! transaction with the pair's row locked, so two concurrent submissions
//! for the same (candidate, citizen) pair serialize instead of racing the
//! check-then-act.

use domain::models::{vote_transition, Vote, VoteOutcome, VoteTransition, VoteType};
use sqlx::PgPool;
use std::str::FromStr;

use crate::entities::VoteEntity;

/// Repository for votes.
#[derive(Clone)]
pub struct VoteRepository {
    pool: PgPool,
}

impl VoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies one vote submission for a (candidate, citizen) pair and
    /// returns what happened.
    pub async fn submit(
        &self,
        candidate_id: i64,
        citizen_id: i64,
        submitted: VoteType,
    ) -> Result<VoteOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> = sqlx::query_scalar(
            "SELECT vote_type FROM votes WHERE candidate_id = $1 AND citizen_id = $2 FOR UPDATE",
        )
        .bind(candidate_id)
        .bind(citizen_id)
        .fetch_optional(&mut *tx)
        .await?;
        let current = current.and_then(|s| VoteType::from_str(&s).ok());

        let outcome = match vote_transition(current, submitted) {
            VoteTransition::Remove => {
                sqlx::query("DELETE FROM votes WHERE candidate_id = $1 AND citizen_id = $2")
                    .bind(candidate_id)
                    .bind(citizen_id)
                    .execute(&mut *tx)
                    .await?;
                VoteOutcome::Removed
            }
            VoteTransition::Cast(vote_type) | VoteTransition::Flip(vote_type) => {
                let inserted: bool = sqlx::query_scalar(
                    r#"
                    INSERT INTO votes (candidate_id, citizen_id, vote_type)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (candidate_id, citizen_id)
                    DO UPDATE SET vote_type = EXCLUDED.vote_type, timestamp = now()
                    RETURNING (xmax = 0)
                    "#,
                )
                .bind(candidate_id)
                .bind(citizen_id)
                .bind(vote_type.as_str())
                .fetch_one(&mut *tx)
                .await?;

                if inserted {
                    VoteOutcome::Cast
                } else {
                    VoteOutcome::Updated
                }
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// The citizen's current vote on a candidate, if any.
    pub async fn find_for_pair(
        &self,
        candidate_id: i64,
        citizen_id: i64,
    ) -> Result<Option<Vote>, sqlx::Error> {
        let entity = sqlx::query_as::<_, VoteEntity>(
            r#"
            SELECT id, candidate_id, citizen_id, vote_type, timestamp
            FROM votes
            WHERE candidate_id = $1 AND citizen_id = $2
            "#,
        )
        .bind(candidate_id)
        .bind(citizen_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// A candidate's votes, newest first.
    pub async fn list_for_candidate(
        &self,
        candidate_id: i64,
        limit: i64,
    ) -> Result<Vec<Vote>, sqlx::Error> {
        let entities = sqlx::query_as::<_, VoteEntity>(
            r#"
            SELECT id, candidate_id, citizen_id, vote_type, timestamp
            FROM votes
            WHERE candidate_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(candidate_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Vote>, sqlx::Error> {
        let entities = sqlx::query_as::<_, VoteEntity>(
            "SELECT id, candidate_id, citizen_id, vote_type, timestamp FROM votes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
