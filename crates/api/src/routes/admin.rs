//! Administration: dashboard, users, candidates, and news management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use validator::ValidateEmail;

use domain::governorates;
use domain::models::{
    ActionType, Account, ActivityLog, Candidate, CreateCandidateInput, CreateNewsInput,
    DashboardStats, EntityKind, LogActivityInput, News, NewsAdminQuery, NewsCounters, Role,
    Severity, UpdateNewsInput, UserListQuery,
};
use persistence::repositories::{
    CandidateRepository, NewAccount, NewCandidate, NewsRepository, ReportsRepository,
};
use shared::pagination::Paginated;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminUser, ClientMeta};
use crate::routes::Ack;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub recent_activities: Vec<ActivityLog>,
}

/// Admin dashboard: site-wide totals and the latest activity.
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, ApiError> {
    let reports = ReportsRepository::new(state.pool.clone());
    let stats = reports.dashboard_stats().await?;
    let recent_activities = state.activity.recent(10).await?;

    Ok(Json(AdminDashboardResponse {
        stats,
        recent_activities,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUser {
    #[serde(flatten)]
    pub account: Account,
    pub role: Role,
}

/// User management listing: search, role, and status filters, 20/page.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (users, total, window) = state.accounts.list_for_admin(&query).await?;
    let users = users
        .into_iter()
        .map(|(account, role)| ManagedUser { account, role })
        .collect();

    Ok(Json(Paginated::new(users, window, total)))
}

/// Creates a candidate account: identity plus profile in one transaction.
/// Any failure aborts before a row lands, with the specific reason.
pub async fn create_candidate(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    meta: ClientMeta,
    Json(input): Json<CreateCandidateInput>,
) -> Result<impl IntoResponse, ApiError> {
    if input.username.trim().is_empty()
        || input.password.is_empty()
        || input.candidate_name.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "يرجى ملء جميع الحقول المطلوبة".to_string(),
        ));
    }
    if !input.email.validate_email() {
        return Err(ApiError::Validation("البريد الإلكتروني غير صحيح".to_string()));
    }
    if !governorates::is_valid_id(input.governorate_id) {
        return Err(ApiError::Validation("المحافظة المطلوبة غير موجودة".to_string()));
    }
    if state.accounts.username_exists(&input.username).await? {
        return Err(ApiError::Conflict("اسم المستخدم موجود بالفعل".to_string()));
    }
    if state.accounts.email_exists(&input.email).await? {
        return Err(ApiError::Conflict("البريد الإلكتروني مستخدم بالفعل".to_string()));
    }

    let password_hash = shared::password::hash_password(&input.password)?;

    let mut tx = state.pool.begin().await?;
    let account = state
        .accounts
        .insert_in_tx(
            &mut tx,
            &NewAccount {
                username: input.username.trim().to_string(),
                email: input.email.clone(),
                password_hash: Some(password_hash),
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                is_staff: false,
            },
        )
        .await?;
    let candidate = CandidateRepository::new(state.pool.clone())
        .insert_in_tx(
            &mut tx,
            &NewCandidate {
                account_id: account.id,
                name: input.candidate_name.trim().to_string(),
                governorate_id: input.governorate_id,
                constituency: input.constituency.clone(),
                election_number: input.election_number.clone(),
                election_symbol: input.election_symbol.clone(),
            },
        )
        .await?;
    tx.commit().await?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::CandidateCreated,
            format!("إنشاء حساب مرشح جديد: {}", candidate.name),
        )
        .with_actor(admin.account.id)
        .with_related(EntityKind::Candidate, candidate.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok((StatusCode::CREATED, Json(candidate)))
}

/// All candidates for the management screen.
pub async fn list_candidates(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Candidate>>, ApiError> {
    let candidates = CandidateRepository::new(state.pool.clone()).list_all().await?;
    Ok(Json(candidates))
}

/// Deletes a candidate by deleting the underlying account; the profile
/// and all its children cascade away.
pub async fn delete_candidate(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(candidate_id): Path<i64>,
    meta: ClientMeta,
) -> Result<impl IntoResponse, ApiError> {
    let candidates = CandidateRepository::new(state.pool.clone());
    let candidate = candidates
        .find_by_id(candidate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("المرشح المطلوب غير موجود".to_string()))?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::CandidateDeleted,
            format!("حذف حساب المرشح {}", candidate.name),
        )
        .with_actor(admin.account.id)
        .with_severity(Severity::Warning)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    state.accounts.delete(candidate.account_id).await?;

    Ok(Json(Ack::new(format!(
        "تم حذف حساب المرشح {} بنجاح",
        candidate.name
    ))))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsManagementResponse {
    #[serde(flatten)]
    pub page: Paginated<News>,
    #[serde(flatten)]
    pub counters: NewsCounters,
}

/// News management listing with search and status/priority filters.
pub async fn list_news(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<NewsAdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NewsRepository::new(state.pool.clone());
    let (items, total, window) = repo.list_for_admin(&query).await?;
    let counters = repo.counters().await?;

    Ok(Json(NewsManagementResponse {
        page: Paginated::new(items, window, total),
        counters,
    }))
}

/// Creates a news item.
pub async fn create_news(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    meta: ClientMeta,
    Json(input): Json<CreateNewsInput>,
) -> Result<impl IntoResponse, ApiError> {
    input.validate_fields().map_err(ApiError::Validation)?;

    let repo = NewsRepository::new(state.pool.clone());
    let news = repo.insert(admin.account.id, &input).await?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::NewsCreated,
            format!("إنشاء خبر جديد: {}", news.title),
        )
        .with_actor(admin.account.id)
        .with_related(EntityKind::News, news.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok((StatusCode::CREATED, Json(news)))
}

/// Edits a news item; absent fields are left unchanged.
pub async fn update_news(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(news_id): Path<i64>,
    meta: ClientMeta,
    Json(input): Json<UpdateNewsInput>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NewsRepository::new(state.pool.clone());
    let news = repo
        .update(news_id, &input)
        .await?
        .ok_or_else(|| ApiError::NotFound("الخبر المطلوب غير موجود".to_string()))?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::NewsUpdated,
            format!("تحديث الخبر: {}", news.title),
        )
        .with_actor(admin.account.id)
        .with_related(EntityKind::News, news.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(news))
}

/// Deletes a news item.
pub async fn delete_news(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(news_id): Path<i64>,
    meta: ClientMeta,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NewsRepository::new(state.pool.clone());
    let news = repo
        .delete(news_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("الخبر المطلوب غير موجود".to_string()))?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::NewsDeleted,
            format!("حذف الخبر: {}", news.title),
        )
        .with_actor(admin.account.id)
        .with_severity(Severity::Warning)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(Ack::new("تم حذف الخبر بنجاح")))
}

/// Toggles a news item between draft and published; archived items
/// republish.
pub async fn toggle_news_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(news_id): Path<i64>,
    meta: ClientMeta,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NewsRepository::new(state.pool.clone());
    let news = repo
        .toggle_status(news_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("الخبر المطلوب غير موجود".to_string()))?;

    let action = if news.status == domain::models::NewsStatus::Published {
        ActionType::NewsPublished
    } else {
        ActionType::NewsUpdated
    };

    state.activity.insert_detached(
        LogActivityInput::new(
            action,
            format!(
                "تغيير حالة الخبر \"{}\" إلى {}",
                news.title,
                news.status.label_ar()
            ),
        )
        .with_actor(admin.account.id)
        .with_related(EntityKind::News, news.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(news))
}
