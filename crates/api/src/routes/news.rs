//! Public news endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use domain::models::TickerItem;
use persistence::repositories::NewsRepository;
use shared::pagination::{PageQuery, Paginated};

use crate::app::AppState;
use crate::error::ApiError;

/// Published news, newest first, ten per page.
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NewsRepository::new(state.pool.clone());
    let window = page.resolve(10);
    let (items, total) = repo.list_published(window).await?;

    Ok(Json(Paginated::new(items, window, total)))
}

/// One news item. Every read bumps the raw view counter; items outside
/// the active window are not publicly visible.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NewsRepository::new(state.pool.clone());
    let item = repo
        .find_and_increment_views(id)
        .await?
        .filter(|item| item.is_active(Utc::now()))
        .ok_or_else(|| ApiError::NotFound("الخبر المطلوب غير موجود".to_string()))?;

    Ok(Json(item))
}

/// The scrolling ticker feed: up to five active, ticker-flagged items.
pub async fn ticker(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = NewsRepository::new(state.pool.clone());
    let items: Vec<TickerItem> = repo
        .ticker(5)
        .await?
        .into_iter()
        .map(|n| TickerItem {
            id: n.id,
            title: n.title,
            content: n.content,
            priority: n.priority,
            ticker_speed: n.ticker_speed,
        })
        .collect();

    Ok(Json(serde_json::json!({ "news": items })))
}
