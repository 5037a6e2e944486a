//! Reports, CSV exports, and chart data (admin only).

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use domain::models::{
    DashboardStats, EngagementWindow, GovernorateCount, PeriodStats, SystemHealth, TopCandidate,
    ENGAGEMENT_WINDOWS,
};
use persistence::repositories::ReportsRepository;

use crate::app::AppState;
use crate::csv::write_csv;
use crate::error::ApiError;
use crate::extractors::AdminUser;

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsDashboardResponse {
    pub days: i64,
    pub totals: DashboardStats,
    pub period: PeriodStats,
    pub top_candidates: Vec<TopCandidate>,
    pub governorates: Vec<GovernorateCount>,
    pub system_health: SystemHealth,
    pub recent_errors: i64,
}

/// The reports dashboard over a trailing window (default 30 days).
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, ApiError> {
    let days = params.days.unwrap_or(30).clamp(1, 365);
    let reports = ReportsRepository::new(state.pool.clone());

    let totals = reports.dashboard_stats().await?;
    let period = reports.period_stats(days).await?;
    let top_candidates = reports.top_candidates(10).await?;
    let governorates = reports.governorate_distribution(10).await?;
    let recent_errors = state.activity.error_count_since_days(days).await?;

    Ok(Json(ReportsDashboardResponse {
        days,
        totals,
        period,
        top_candidates,
        governorates,
        system_health: SystemHealth::from_error_count(recent_errors),
        recent_errors,
    }))
}

/// Candidate performance: the top twenty by engagement.
pub async fn candidate_performance(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<TopCandidate>>, ApiError> {
    let reports = ReportsRepository::new(state.pool.clone());
    Ok(Json(reports.top_candidates(20).await?))
}

/// User engagement over the standard windows (day/week/month/quarter).
pub async fn user_engagement(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<EngagementWindow>>, ApiError> {
    let reports = ReportsRepository::new(state.pool.clone());

    let mut windows = Vec::with_capacity(ENGAGEMENT_WINDOWS.len());
    for (label, days) in ENGAGEMENT_WINDOWS {
        windows.push(EngagementWindow {
            label,
            days,
            stats: reports.period_stats(days).await?,
        });
    }

    Ok(Json(windows))
}

/// CSV export for the `candidates` and `users` report types. UTF-8 with
/// BOM, header row matching the displayed column names.
pub async fn export_csv(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(report_type): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = match report_type.as_str() {
        "candidates" => {
            let reports = ReportsRepository::new(state.pool.clone());
            let candidates = reports.top_candidates(i64::MAX).await?;
            let rows = candidates
                .into_iter()
                .map(|c| {
                    vec![
                        c.name,
                        c.governorate_name.to_string(),
                        c.total_messages.to_string(),
                        c.total_ratings.to_string(),
                        c.total_votes.to_string(),
                        format!("{:.2}", c.avg_rating),
                    ]
                })
                .collect::<Vec<_>>();
            write_csv(
                &["اسم المرشح", "المحافظة", "الرسائل", "التقييمات", "التصويتات", "متوسط التقييم"],
                &rows,
            )
        }
        "users" => {
            let accounts = state.accounts.list_all().await?;
            let rows = accounts
                .into_iter()
                .map(|a| {
                    vec![
                        a.username.clone(),
                        a.full_name(),
                        a.email.clone(),
                        a.date_joined.format("%Y-%m-%d").to_string(),
                        a.last_login
                            .map(|t| t.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "لم يسجل دخول".to_string()),
                    ]
                })
                .collect::<Vec<_>>();
            write_csv(
                &["اسم المستخدم", "الاسم الكامل", "البريد الإلكتروني", "تاريخ التسجيل", "آخر دخول"],
                &rows,
            )
        }
        _ => {
            return Err(ApiError::NotFound("نوع التقرير غير معروف".to_string()));
        }
    };

    let filename = format!("{}_report.csv", report_type);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    #[serde(rename = "type")]
    pub chart_type: Option<String>,
}

/// Chart data feeds: `daily_activity` and `governorate_distribution`.
pub async fn chart_data(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<ChartParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match params.chart_type.as_deref().unwrap_or("daily_activity") {
        "daily_activity" => {
            let points = state.activity.daily_counts(30).await?;
            Ok(Json(serde_json::json!({ "data": points })))
        }
        "governorate_distribution" => {
            let reports = ReportsRepository::new(state.pool.clone());
            let counts = reports.governorate_distribution(10).await?;
            Ok(Json(serde_json::json!({ "data": counts })))
        }
        _ => Ok(Json(serde_json::json!({ "data": [] }))),
    }
}
