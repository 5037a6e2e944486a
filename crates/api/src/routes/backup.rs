//! JSON backup and restore (admin only).

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use domain::models::{
    ActionType, BackupDocument, LogActivityInput, RestoreOptions, Severity,
};
use persistence::repositories::BackupRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminUser, ClientMeta};

/// Dumps the database as a downloadable JSON document.
pub async fn backup(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    meta: ClientMeta,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BackupRepository::new(state.pool.clone());
    let doc = repo.dump().await?;

    state.activity.insert_detached(
        LogActivityInput::new(ActionType::BackupCreated, "إنشاء نسخة احتياطية من البيانات")
            .with_actor(admin.account.id)
            .with_request_context(meta.ip_address, meta.user_agent),
    );

    let filename = format!(
        "naebak_backup_{}.json",
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    let body = serde_json::to_string_pretty(&doc)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize backup: {}", e)))?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/json; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}

/// Restores a backup document. Foreign keys are re-resolved by the dumped
/// primary keys; rows whose parent is missing are skipped. Optionally
/// clears existing data first.
pub async fn restore(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(options): Query<RestoreOptions>,
    meta: ClientMeta,
    Json(raw): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    BackupDocument::validate_structure(&raw).map_err(ApiError::Validation)?;
    let doc: BackupDocument = serde_json::from_value(raw)
        .map_err(|_| ApiError::Validation("الملف غير صالح أو تالف".to_string()))?;

    let repo = BackupRepository::new(state.pool.clone());
    let summary = repo.restore(&doc, options).await?;

    state.activity.insert_detached(
        LogActivityInput::new(ActionType::BackupRestored, "استعادة نسخة احتياطية من البيانات")
            .with_actor(admin.account.id)
            .with_severity(Severity::Warning)
            .with_extra(serde_json::json!({
                "clearExisting": options.clear_existing,
                "skipped": summary.skipped,
            }))
            .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(summary))
}
