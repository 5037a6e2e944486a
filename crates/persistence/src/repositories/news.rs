//! News repository.

use domain::models::{CreateNewsInput, News, NewsAdminQuery, NewsCounters, UpdateNewsInput};
use shared::pagination::{PageQuery, PageWindow};
use sqlx::PgPool;

use crate::entities::NewsEntity;

const NEWS_COLUMNS: &str = "id, title, content, status, priority, show_on_homepage, \
    show_on_ticker, ticker_speed, publish_date, expire_date, author_id, views_count, \
    meta_description, tags, created_at, updated_at";

/// The "active" predicate: published, past its publish date, not expired.
const ACTIVE_PREDICATE: &str =
    "status = 'published' AND publish_date <= now() AND (expire_date IS NULL OR expire_date > now())";

/// Editorial priority rank for ordering (urgent first).
const PRIORITY_RANK: &str =
    "CASE priority WHEN 'urgent' THEN 0 WHEN 'high' THEN 1 WHEN 'normal' THEN 2 ELSE 3 END";

/// Repository for news items.
#[derive(Clone)]
pub struct NewsRepository {
    pool: PgPool,
}

impl NewsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, author_id: i64, input: &CreateNewsInput) -> Result<News, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO news (title, content, status, priority, show_on_homepage, show_on_ticker,
                              ticker_speed, publish_date, expire_date, meta_description, tags, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, now()), $9, $10, $11, $12)
            RETURNING {}
            "#,
            NEWS_COLUMNS
        );

        let entity = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.show_on_homepage)
            .bind(input.show_on_ticker)
            .bind(input.ticker_speed)
            .bind(input.publish_date)
            .bind(input.expire_date)
            .bind(&input.meta_description)
            .bind(&input.tags)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(entity.into())
    }

    pub async fn update(&self, id: i64, input: &UpdateNewsInput) -> Result<Option<News>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE news SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                show_on_homepage = COALESCE($6, show_on_homepage),
                show_on_ticker = COALESCE($7, show_on_ticker),
                ticker_speed = COALESCE($8, ticker_speed),
                publish_date = COALESCE($9, publish_date),
                expire_date = COALESCE($10, expire_date),
                meta_description = COALESCE($11, meta_description),
                tags = COALESCE($12, tags),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            NEWS_COLUMNS
        );

        let entity = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.show_on_homepage)
            .bind(input.show_on_ticker)
            .bind(input.ticker_speed)
            .bind(input.publish_date)
            .bind(input.expire_date)
            .bind(&input.meta_description)
            .bind(&input.tags)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn delete(&self, id: i64) -> Result<Option<News>, sqlx::Error> {
        let sql = format!("DELETE FROM news WHERE id = $1 RETURNING {}", NEWS_COLUMNS);
        let entity = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<News>, sqlx::Error> {
        let sql = format!("SELECT {} FROM news WHERE id = $1", NEWS_COLUMNS);
        let entity = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// Fetches an item and bumps its view counter. The increment is a raw
    /// hit counter with no per-viewer dedup.
    pub async fn find_and_increment_views(&self, id: i64) -> Result<Option<News>, sqlx::Error> {
        let sql = format!(
            "UPDATE news SET views_count = views_count + 1 WHERE id = $1 RETURNING {}",
            NEWS_COLUMNS
        );
        let entity = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// Flips draft and published; archived items republish. Returns the
    /// updated row.
    pub async fn toggle_status(&self, id: i64) -> Result<Option<News>, sqlx::Error> {
        let Some(news) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let new_status = news.status.toggled();
        let sql = format!(
            "UPDATE news SET status = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            NEWS_COLUMNS
        );
        let entity = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(id)
            .bind(new_status.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// Currently active items, urgent first then newest.
    pub async fn active(&self, limit: i64) -> Result<Vec<News>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM news WHERE {} ORDER BY {}, publish_date DESC LIMIT $1",
            NEWS_COLUMNS, ACTIVE_PREDICATE, PRIORITY_RANK
        );
        let entities = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Active items flagged for the ticker.
    pub async fn ticker(&self, limit: i64) -> Result<Vec<News>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM news WHERE {} AND show_on_ticker ORDER BY {}, publish_date DESC LIMIT $1",
            NEWS_COLUMNS, ACTIVE_PREDICATE, PRIORITY_RANK
        );
        let entities = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Active items flagged for the homepage.
    pub async fn homepage(&self, limit: i64) -> Result<Vec<News>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM news WHERE {} AND show_on_homepage ORDER BY {}, publish_date DESC LIMIT $1",
            NEWS_COLUMNS, ACTIVE_PREDICATE, PRIORITY_RANK
        );
        let entities = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// The public news listing: active items, newest first, paged.
    pub async fn list_published(&self, window: PageWindow) -> Result<(Vec<News>, i64), sqlx::Error> {
        let count_sql = format!("SELECT COUNT(*) FROM news WHERE {}", ACTIVE_PREDICATE);
        let total: i64 = sqlx::query_scalar(&count_sql).fetch_one(&self.pool).await?;

        let sql = format!(
            "SELECT {} FROM news WHERE {} ORDER BY publish_date DESC LIMIT $1 OFFSET $2",
            NEWS_COLUMNS, ACTIVE_PREDICATE
        );
        let entities = sqlx::query_as::<_, NewsEntity>(&sql)
            .bind(window.per_page)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Admin listing with search and status/priority filters.
    pub async fn list_for_admin(
        &self,
        query: &NewsAdminQuery,
    ) -> Result<(Vec<News>, i64, PageWindow), sqlx::Error> {
        let window = PageQuery { page: query.page, per_page: query.per_page }.resolve(10);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_count = 0;

        let search_pattern = query
            .search
            .as_ref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        if search_pattern.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(title ILIKE ${p} OR content ILIKE ${p} OR tags ILIKE ${p})",
                p = param_count
            ));
        }

        let status = query.status.map(|s| s.as_str());
        if status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        let priority = query.priority.map(|p| p.as_str());
        if priority.is_some() {
            param_count += 1;
            conditions.push(format!("priority = ${}", param_count));
        }

        let where_clause = if conditions.is_empty() {
            String::from("TRUE")
        } else {
            conditions.join(" AND ")
        };

        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(ref pattern) = search_pattern {
                    b = b.bind(pattern);
                }
                if let Some(status) = status {
                    b = b.bind(status);
                }
                if let Some(priority) = priority {
                    b = b.bind(priority);
                }
                b
            }};
        }

        let count_sql = format!("SELECT COUNT(*) FROM news WHERE {}", where_clause);
        let total: i64 = bind_filters!(sqlx::query_scalar(&count_sql))
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            "SELECT {} FROM news WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            NEWS_COLUMNS,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let entities = bind_filters!(sqlx::query_as::<_, NewsEntity>(&list_sql))
            .bind(window.per_page)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total, window))
    }

    /// Status counters shown above the admin listing.
    pub async fn counters(&self) -> Result<NewsCounters, sqlx::Error> {
        let row: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'published'),
                   COUNT(*) FILTER (WHERE status = 'draft'),
                   COUNT(*) FILTER (WHERE priority = 'urgent')
            FROM news
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(NewsCounters {
            total_news: row.0,
            published_news: row.1,
            draft_news: row.2,
            urgent_news: row.3,
        })
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM news")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<News>, sqlx::Error> {
        let sql = format!("SELECT {} FROM news ORDER BY id", NEWS_COLUMNS);
        let entities = sqlx::query_as::<_, NewsEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
