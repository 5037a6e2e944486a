//! Activity log repository: a write-only sink with filtered reads.

use domain::models::{
    ActivityListQuery, ActivityLog, ActivityStats, ChartPoint, LogActivityInput, SECURITY_ACTIONS,
};
use shared::pagination::{PageQuery, PageWindow};
use sqlx::PgPool;

use crate::entities::ActivityLogEntity;

const ACTIVITY_COLUMNS: &str = "id, account_id, action_type, description, severity, \
    ip_address, user_agent, related_kind, related_id, extra_data, timestamp";

/// Repository for the activity log.
#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends one activity row.
    pub async fn insert(&self, input: LogActivityInput) -> Result<ActivityLog, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO activity_logs
                (account_id, action_type, description, severity, ip_address, user_agent,
                 related_kind, related_id, extra_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ACTIVITY_COLUMNS
        );

        let entity = sqlx::query_as::<_, ActivityLogEntity>(&sql)
            .bind(input.account_id)
            .bind(input.action_type.as_str())
            .bind(&input.description)
            .bind(input.severity.as_str())
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(input.related.map(|r| r.kind.as_str()))
            .bind(input.related.map(|r| r.id))
            .bind(&input.extra_data)
            .fetch_one(&self.pool)
            .await?;

        Ok(entity.into())
    }

    /// Fire-and-forget append; a failed audit write never fails the
    /// request that caused it.
    pub fn insert_detached(&self, input: LogActivityInput) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let repo = ActivityLogRepository::new(pool);
            if let Err(e) = repo.insert(input).await {
                tracing::error!("Failed to write activity log: {}", e);
            }
        });
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ActivityLog>, sqlx::Error> {
        let sql = format!("SELECT {} FROM activity_logs WHERE id = $1", ACTIVITY_COLUMNS);
        let entity = sqlx::query_as::<_, ActivityLogEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// Most recent activities.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM activity_logs ORDER BY timestamp DESC LIMIT $1",
            ACTIVITY_COLUMNS
        );
        let entities = sqlx::query_as::<_, ActivityLogEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// One user's activities, newest first.
    pub async fn for_account(
        &self,
        account_id: i64,
        limit: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM activity_logs WHERE account_id = $1 ORDER BY timestamp DESC LIMIT $2",
            ACTIVITY_COLUMNS
        );
        let entities = sqlx::query_as::<_, ActivityLogEntity>(&sql)
            .bind(account_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Recent security-related activities (logins, registrations, alerts).
    pub async fn security_alerts(&self, limit: i64) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let actions: Vec<&str> = SECURITY_ACTIONS.iter().map(|a| a.as_str()).collect();
        let sql = format!(
            "SELECT {} FROM activity_logs WHERE action_type = ANY($1) ORDER BY timestamp DESC LIMIT $2",
            ACTIVITY_COLUMNS
        );
        let entities = sqlx::query_as::<_, ActivityLogEntity>(&sql)
            .bind(&actions)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Recent error and critical activities.
    pub async fn critical(&self, limit: i64) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM activity_logs WHERE severity IN ('error', 'critical') ORDER BY timestamp DESC LIMIT $1",
            ACTIVITY_COLUMNS
        );
        let entities = sqlx::query_as::<_, ActivityLogEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Filtered and paged listing for the admin monitoring screen.
    pub async fn list(
        &self,
        query: &ActivityListQuery,
    ) -> Result<(Vec<ActivityLog>, i64, PageWindow), sqlx::Error> {
        let window = PageQuery { page: query.page, per_page: query.per_page }.resolve(50);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_count = 0;

        let action = query.action.map(|a| a.as_str());
        if action.is_some() {
            param_count += 1;
            conditions.push(format!("action_type = ${}", param_count));
        }

        let severity = query.severity.map(|s| s.as_str());
        if severity.is_some() {
            param_count += 1;
            conditions.push(format!("severity = ${}", param_count));
        }

        if query.account_id.is_some() {
            param_count += 1;
            conditions.push(format!("account_id = ${}", param_count));
        }

        let search_pattern = query
            .search
            .as_ref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        if search_pattern.is_some() {
            param_count += 1;
            conditions.push(format!("description ILIKE ${}", param_count));
        }

        let where_clause = if conditions.is_empty() {
            String::from("TRUE")
        } else {
            conditions.join(" AND ")
        };

        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(action) = action {
                    b = b.bind(action);
                }
                if let Some(severity) = severity {
                    b = b.bind(severity);
                }
                if let Some(account_id) = query.account_id {
                    b = b.bind(account_id);
                }
                if let Some(ref pattern) = search_pattern {
                    b = b.bind(pattern);
                }
                b
            }};
        }

        let count_sql = format!("SELECT COUNT(*) FROM activity_logs WHERE {}", where_clause);
        let total: i64 = bind_filters!(sqlx::query_scalar(&count_sql))
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            "SELECT {} FROM activity_logs WHERE {} ORDER BY timestamp DESC LIMIT ${} OFFSET ${}",
            ACTIVITY_COLUMNS,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let entities = bind_filters!(sqlx::query_as::<_, ActivityLogEntity>(&list_sql))
            .bind(window.per_page)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total, window))
    }

    /// Severity counters over the trailing 24 hours.
    pub async fn stats_last_day(&self) -> Result<ActivityStats, sqlx::Error> {
        let row: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE severity = 'critical'),
                   COUNT(*) FILTER (WHERE severity = 'error'),
                   COUNT(*) FILTER (WHERE severity = 'warning')
            FROM activity_logs
            WHERE timestamp >= now() - INTERVAL '24 hours'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ActivityStats {
            total_today: row.0,
            critical_today: row.1,
            errors_today: row.2,
            warnings_today: row.3,
        })
    }

    /// Error and critical rows since the given number of days ago.
    pub async fn error_count_since_days(&self, days: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM activity_logs \
             WHERE severity IN ('error', 'critical') AND timestamp >= now() - $1 * INTERVAL '1 day'",
        )
        .bind(days as f64)
        .fetch_one(&self.pool)
        .await
    }

    /// Daily activity counts for the chart, one point per day including
    /// zero-activity days, oldest first.
    pub async fn daily_counts(&self, days: i64) -> Result<Vec<ChartPoint>, sqlx::Error> {
        let rows: Vec<(chrono::NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT (timestamp AT TIME ZONE 'UTC')::date AS day, COUNT(*)
            FROM activity_logs
            WHERE timestamp >= now() - $1 * INTERVAL '1 day'
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(days as f64)
        .fetch_all(&self.pool)
        .await?;

        let by_day: std::collections::HashMap<_, _> = rows.into_iter().collect();
        let today = chrono::Utc::now().date_naive();

        let points = (0..days)
            .rev()
            .filter_map(|back| today.checked_sub_days(chrono::Days::new(back as u64)))
            .map(|date| ChartPoint {
                date,
                count: by_day.get(&date).copied().unwrap_or(0),
            })
            .collect();

        Ok(points)
    }
}
