//! News entity.

use chrono::{DateTime, Utc};
use domain::models::{News, NewsPriority, NewsStatus};
use sqlx::FromRow;
use std::str::FromStr;

/// Database entity for news items.
#[derive(Debug, Clone, FromRow)]
pub struct NewsEntity {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: String,
    pub priority: String,
    pub show_on_homepage: bool,
    pub show_on_ticker: bool,
    pub ticker_speed: i32,
    pub publish_date: DateTime<Utc>,
    pub expire_date: Option<DateTime<Utc>>,
    pub author_id: i64,
    pub views_count: i64,
    pub meta_description: String,
    pub tags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NewsEntity> for News {
    fn from(e: NewsEntity) -> Self {
        News {
            id: e.id,
            title: e.title,
            content: e.content,
            status: NewsStatus::from_str(&e.status).unwrap_or_default(),
            priority: NewsPriority::from_str(&e.priority).unwrap_or_default(),
            show_on_homepage: e.show_on_homepage,
            show_on_ticker: e.show_on_ticker,
            ticker_speed: e.ticker_speed,
            publish_date: e.publish_date,
            expire_date: e.expire_date,
            author_id: e.author_id,
            views_count: e.views_count,
            meta_description: e.meta_description,
            tags: e.tags,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
