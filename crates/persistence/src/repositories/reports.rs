//! Aggregate queries behind the admin dashboard and reports.

use std::collections::HashMap;

use domain::governorates;
use domain::models::{
    DashboardStats, GovernorateCount, GovernorateSort, GovernorateStats, PeriodStats, TopCandidate,
};
use sqlx::PgPool;

/// Repository for cross-entity statistics.
#[derive(Clone)]
pub struct ReportsRepository {
    pool: PgPool,
}

impl ReportsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Site-wide totals for the admin dashboard.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, sqlx::Error> {
        let row: (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM accounts),
                   (SELECT COUNT(*) FROM candidates),
                   (SELECT COUNT(*) FROM messages),
                   (SELECT COUNT(*) FROM ratings),
                   (SELECT COUNT(*) FROM votes),
                   (SELECT COUNT(*) FROM news)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_users: row.0,
            total_candidates: row.1,
            total_messages: row.2,
            total_ratings: row.3,
            total_votes: row.4,
            total_news: row.5,
        })
    }

    /// Activity inside the trailing window of `days`.
    pub async fn period_stats(&self, days: i64) -> Result<PeriodStats, sqlx::Error> {
        let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM accounts WHERE date_joined >= now() - $1 * INTERVAL '1 day'),
                   (SELECT COUNT(*) FROM accounts WHERE last_login >= now() - $1 * INTERVAL '1 day'),
                   (SELECT COUNT(*) FROM messages WHERE timestamp >= now() - $1 * INTERVAL '1 day'),
                   (SELECT COUNT(*) FROM ratings WHERE timestamp >= now() - $1 * INTERVAL '1 day'),
                   (SELECT COUNT(*) FROM votes WHERE timestamp >= now() - $1 * INTERVAL '1 day')
            "#,
        )
        .bind(days as f64)
        .fetch_one(&self.pool)
        .await?;

        Ok(PeriodStats {
            new_users: row.0,
            active_users: row.1,
            new_messages: row.2,
            new_ratings: row.3,
            new_votes: row.4,
        })
    }

    /// Candidates ranked by total engagement (messages + ratings + votes).
    pub async fn top_candidates(&self, limit: i64) -> Result<Vec<TopCandidate>, sqlx::Error> {
        let rows: Vec<(i64, String, i32, i64, i64, i64, f64)> = sqlx::query_as(
            r#"
            SELECT t.id, t.name, t.governorate_id,
                   t.total_messages, t.total_ratings, t.total_votes, t.avg_rating
            FROM (
                SELECT c.id, c.name, c.governorate_id,
                       (SELECT COUNT(*) FROM messages m WHERE m.candidate_id = c.id) AS total_messages,
                       (SELECT COUNT(*) FROM ratings r WHERE r.candidate_id = c.id) AS total_ratings,
                       (SELECT COUNT(*) FROM votes v WHERE v.candidate_id = c.id) AS total_votes,
                       COALESCE((SELECT AVG(r.stars)::float8 FROM ratings r WHERE r.candidate_id = c.id), 0) AS avg_rating
                FROM candidates c
            ) t
            ORDER BY (t.total_messages + t.total_ratings + t.total_votes) DESC, t.name
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, governorate_id, messages, ratings, votes, avg_rating)| TopCandidate {
                id,
                name,
                governorate_name: governorates::name_ar(governorate_id),
                total_messages: messages,
                total_ratings: ratings,
                total_votes: votes,
                avg_rating: (avg_rating * 100.0).round() / 100.0,
                total_engagement: messages + ratings + votes,
            })
            .collect())
    }

    /// Candidate counts per governorate, descending, governorates with no
    /// candidates omitted.
    pub async fn governorate_distribution(
        &self,
        limit: usize,
    ) -> Result<Vec<GovernorateCount>, sqlx::Error> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT governorate_id, COUNT(*) FROM candidates GROUP BY governorate_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts: Vec<GovernorateCount> = rows
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(id, count)| GovernorateCount {
                name: governorates::name_ar(id),
                count,
            })
            .collect();

        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(limit);
        Ok(counts)
    }

    /// Statistics for every governorate in the static table, filtered by
    /// an optional name search and sorted per the listing contract.
    pub async fn governorate_stats(
        &self,
        search: Option<&str>,
        sort: GovernorateSort,
    ) -> Result<Vec<GovernorateStats>, sqlx::Error> {
        let candidate_counts = self.per_governorate("SELECT governorate_id, COUNT(*) FROM candidates GROUP BY 1").await?;
        let citizen_counts = self.per_governorate("SELECT governorate_id, COUNT(*) FROM citizens GROUP BY 1").await?;
        let message_counts = self
            .per_governorate(
                "SELECT c.governorate_id, COUNT(m.id) FROM candidates c \
                 JOIN messages m ON m.candidate_id = c.id GROUP BY 1",
            )
            .await?;
        let vote_counts = self
            .per_governorate(
                "SELECT c.governorate_id, COUNT(v.id) FROM candidates c \
                 JOIN votes v ON v.candidate_id = c.id GROUP BY 1",
            )
            .await?;
        let rating_counts = self
            .per_governorate(
                "SELECT c.governorate_id, COUNT(r.id) FROM candidates c \
                 JOIN ratings r ON r.candidate_id = c.id GROUP BY 1",
            )
            .await?;

        // average of candidate averages, matching the listing's display
        let avg_rows: Vec<(i32, f64)> = sqlx::query_as(
            r#"
            SELECT governorate_id, AVG(candidate_avg)::float8
            FROM (
                SELECT c.governorate_id, AVG(r.stars) AS candidate_avg
                FROM candidates c
                JOIN ratings r ON r.candidate_id = c.id
                GROUP BY c.id
            ) t
            GROUP BY governorate_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        let avg_ratings: HashMap<i32, f64> = avg_rows.into_iter().collect();

        let selected = match search {
            Some(query) if !query.trim().is_empty() => governorates::search(query),
            _ => governorates::all().iter().collect(),
        };

        let mut stats: Vec<GovernorateStats> = selected
            .into_iter()
            .map(|g| {
                let total_messages = message_counts.get(&g.id).copied().unwrap_or(0);
                let total_votes = vote_counts.get(&g.id).copied().unwrap_or(0);
                let total_ratings = rating_counts.get(&g.id).copied().unwrap_or(0);
                GovernorateStats {
                    governorate: *g,
                    total_candidates: candidate_counts.get(&g.id).copied().unwrap_or(0),
                    total_citizens: citizen_counts.get(&g.id).copied().unwrap_or(0),
                    total_messages,
                    total_votes,
                    total_ratings,
                    total_activity: total_messages + total_votes + total_ratings,
                    avg_rating: avg_ratings
                        .get(&g.id)
                        .map(|avg| (avg * 10.0).round() / 10.0)
                        .unwrap_or(0.0),
                }
            })
            .collect();

        match sort {
            GovernorateSort::Name => {
                stats.sort_by(|a, b| a.governorate.name_ar.cmp(b.governorate.name_ar))
            }
            GovernorateSort::CandidatesCount => {
                stats.sort_by(|a, b| b.total_candidates.cmp(&a.total_candidates))
            }
            GovernorateSort::Activity => {
                stats.sort_by(|a, b| b.total_activity.cmp(&a.total_activity))
            }
        }

        Ok(stats)
    }

    async fn per_governorate(&self, sql: &str) -> Result<HashMap<i32, i64>, sqlx::Error> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().collect())
    }
}
