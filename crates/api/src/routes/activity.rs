//! Activity monitoring endpoints (admin only). The log itself is
//! append-only: there are no update or delete operations here.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use domain::models::{ActivityListQuery, ActivityLog};
use shared::pagination::Paginated;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminUser;

/// Filtered, paginated activity listing.
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ActivityListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total, window) = state.activity.list(&query).await?;
    Ok(Json(Paginated::new(items, window, total)))
}

/// One activity entry.
pub async fn detail(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<ActivityLog>, ApiError> {
    let activity = state
        .activity
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("النشاط المطلوب غير موجود".to_string()))?;

    Ok(Json(activity))
}

/// A user's activity history (most recent 100).
pub async fn user_history(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(account_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .accounts
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("المستخدم المطلوب غير موجود".to_string()))?;

    let activities = state.activity.for_account(account_id, 100).await?;

    Ok(Json(serde_json::json!({
        "account": account,
        "activities": activities,
    })))
}

/// Recent security-related activities.
pub async fn security_alerts(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    Ok(Json(state.activity.security_alerts(20).await?))
}

/// Recent error and critical activities.
pub async fn critical(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    Ok(Json(state.activity.critical(20).await?))
}

/// Severity counters for the trailing 24 hours.
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.activity.stats_last_day().await?))
}
