//! News and ticker models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication state of a news item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl NewsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Draft => "draft",
            NewsStatus::Published => "published",
            NewsStatus::Archived => "archived",
        }
    }

    pub fn label_ar(&self) -> &'static str {
        match self {
            NewsStatus::Draft => "مسودة",
            NewsStatus::Published => "منشور",
            NewsStatus::Archived => "مؤرشف",
        }
    }

    /// The admin toggle flips draft and published; archiving is one-way
    /// from the admin surface.
    pub fn toggled(&self) -> NewsStatus {
        match self {
            NewsStatus::Published => NewsStatus::Draft,
            _ => NewsStatus::Published,
        }
    }
}

impl FromStr for NewsStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(NewsStatus::Draft),
            "published" => Ok(NewsStatus::Published),
            "archived" => Ok(NewsStatus::Archived),
            _ => Err(format!("Unknown news status: {}", s)),
        }
    }
}

impl fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Editorial priority of a news item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl NewsPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsPriority::Low => "low",
            NewsPriority::Normal => "normal",
            NewsPriority::High => "high",
            NewsPriority::Urgent => "urgent",
        }
    }

    pub fn label_ar(&self) -> &'static str {
        match self {
            NewsPriority::Low => "منخفضة",
            NewsPriority::Normal => "عادية",
            NewsPriority::High => "عالية",
            NewsPriority::Urgent => "عاجل",
        }
    }
}

impl FromStr for NewsPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(NewsPriority::Low),
            "normal" => Ok(NewsPriority::Normal),
            "high" => Ok(NewsPriority::High),
            "urgent" => Ok(NewsPriority::Urgent),
            _ => Err(format!("Unknown news priority: {}", s)),
        }
    }
}

impl fmt::Display for NewsPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A news item, shown on the homepage and the scrolling ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: NewsStatus,
    pub priority: NewsPriority,
    pub show_on_homepage: bool,
    pub show_on_ticker: bool,
    /// Ticker scroll duration in seconds.
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

impl News {
    /// Whether the item is currently visible: published, past its publish
    /// date, and not expired.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == NewsStatus::Published
            && self.publish_date <= now
            && self.expire_date.map_or(true, |expiry| expiry > now)
    }
}

/// Admin payload creating a news item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: NewsStatus,
    #[serde(default)]
    pub priority: NewsPriority,
    #[serde(default = "default_true")]
    pub show_on_homepage: bool,
    #[serde(default = "default_true")]
    pub show_on_ticker: bool,
    #[serde(default = "default_ticker_speed")]
    pub ticker_speed: i32,
    pub publish_date: Option<DateTime<Utc>>,
    pub expire_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub tags: String,
}

fn default_true() -> bool {
    true
}

fn default_ticker_speed() -> i32 {
    50
}

impl CreateNewsInput {
    pub fn validate_fields(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            Err("يرجى ملء جميع الحقول المطلوبة".to_string())
        } else {
            Ok(())
        }
    }
}

/// Admin payload editing a news item; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<NewsStatus>,
    pub priority: Option<NewsPriority>,
    pub show_on_homepage: Option<bool>,
    pub show_on_ticker: Option<bool>,
    pub ticker_speed: Option<i32>,
    pub publish_date: Option<DateTime<Utc>>,
    pub expire_date: Option<DateTime<Utc>>,
    pub meta_description: Option<String>,
    pub tags: Option<String>,
}

/// Filters for the admin news listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsAdminQuery {
    pub search: Option<String>,
    pub status: Option<NewsStatus>,
    pub priority: Option<NewsPriority>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Status counters shown above the admin news listing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsCounters {
    pub total_news: i64,
    pub published_news: i64,
    pub draft_news: i64,
    pub urgent_news: i64,
}

/// One entry in the ticker feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub priority: NewsPriority,
    pub ticker_speed: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn news(status: NewsStatus) -> News {
        let now = Utc::now();
        News {
            id: 1,
            title: "خبر".to_string(),
            content: "محتوى".to_string(),
            status,
            priority: NewsPriority::Normal,
            show_on_homepage: true,
            show_on_ticker: true,
            ticker_speed: 50,
            publish_date: now - Duration::hours(1),
            expire_date: None,
            author_id: 1,
            views_count: 0,
            meta_description: String::new(),
            tags: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_published_past_publish_date_is_active() {
        assert!(news(NewsStatus::Published).is_active(Utc::now()));
    }

    #[test]
    fn test_draft_is_not_active() {
        assert!(!news(NewsStatus::Draft).is_active(Utc::now()));
        assert!(!news(NewsStatus::Archived).is_active(Utc::now()));
    }

    #[test]
    fn test_future_publish_date_is_not_active() {
        let mut item = news(NewsStatus::Published);
        item.publish_date = Utc::now() + Duration::hours(1);
        assert!(!item.is_active(Utc::now()));
    }

    #[test]
    fn test_expired_is_not_active() {
        let mut item = news(NewsStatus::Published);
        item.expire_date = Some(Utc::now() - Duration::minutes(5));
        assert!(!item.is_active(Utc::now()));
    }

    #[test]
    fn test_future_expiry_is_active() {
        let mut item = news(NewsStatus::Published);
        item.expire_date = Some(Utc::now() + Duration::days(1));
        assert!(item.is_active(Utc::now()));
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(NewsStatus::Published.toggled(), NewsStatus::Draft);
        assert_eq!(NewsStatus::Draft.toggled(), NewsStatus::Published);
        // archived items republish through the toggle
        assert_eq!(NewsStatus::Archived.toggled(), NewsStatus::Published);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [NewsStatus::Draft, NewsStatus::Published, NewsStatus::Archived] {
            assert_eq!(NewsStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(NewsStatus::from_str("pending").is_err());
    }

    #[test]
    fn test_priority_round_trip() {
        for priority in [
            NewsPriority::Low,
            NewsPriority::Normal,
            NewsPriority::High,
            NewsPriority::Urgent,
        ] {
            assert_eq!(NewsPriority::from_str(priority.as_str()).unwrap(), priority);
        }
        assert!(NewsPriority::from_str("critical").is_err());
    }

    #[test]
    fn test_create_input_defaults() {
        let input: CreateNewsInput =
            serde_json::from_str(r#"{"title":"خبر","content":"محتوى"}"#).unwrap();
        assert_eq!(input.status, NewsStatus::Draft);
        assert_eq!(input.priority, NewsPriority::Normal);
        assert!(input.show_on_homepage);
        assert!(input.show_on_ticker);
        assert_eq!(input.ticker_speed, 50);
    }
}
