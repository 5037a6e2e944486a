//! Public candidate pages and the candidate dashboard.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use domain::models::{
    ActionType, Candidate, CandidateDetail, CandidateListQuery, CandidateStats,
    CandidateWithStats, ElectoralPromise, EntityKind, LogActivityInput, Message, PromiseInput,
    PublicServiceHistory, Rating, RatingDistribution, ServiceHistoryInput, UpdateCandidateInput,
    Vote, CANDIDATES_PER_PAGE,
};
use persistence::repositories::{
    CandidateRepository, MessageRepository, PromiseRepository, RatingRepository, VoteRepository,
};
use shared::pagination::{PageQuery, Paginated};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CandidateUser, ClientMeta, OptionalUser};
use crate::routes::Ack;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListResponse {
    #[serde(flatten)]
    pub page: Paginated<CandidateWithStats>,
    pub total_candidates: i64,
}

/// All candidates with statistics: search, governorate filter, sort, and
/// 12-per-page pagination. Statistics cover the whole filtered set.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CandidateRepository::new(state.pool.clone());
    let (rows, total) = repo.list_with_stats(&query).await?;
    let window =
        PageQuery { page: query.page, per_page: query.per_page }.resolve(CANDIDATES_PER_PAGE);

    Ok(Json(CandidateListResponse {
        page: Paginated::new(
            rows.into_iter().map(CandidateWithStats::from).collect(),
            window,
            total,
        ),
        total_candidates: total,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDetailResponse {
    #[serde(flatten)]
    pub detail: CandidateDetail,
    pub electoral_promises: Vec<ElectoralPromise>,
    pub service_history: Vec<PublicServiceHistory>,
    pub recent_ratings: Vec<Rating>,
    pub user_vote: Option<Vote>,
    pub user_rating: Option<Rating>,
}

/// A candidate's public page: profile, statistics, rating breakdown,
/// promises, service history, and the viewer's own vote and rating.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    OptionalUser(user): OptionalUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CandidateRepository::new(state.pool.clone());
    let (candidate, stats) = repo
        .find_with_stats(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("المرشح المطلوب غير موجود".to_string()))?;

    let ratings = RatingRepository::new(state.pool.clone());
    let promises = PromiseRepository::new(state.pool.clone());
    let votes = VoteRepository::new(state.pool.clone());

    let rating_distribution = ratings.distribution(id).await?;
    let electoral_promises = promises.list_for_candidate(id).await?;
    let service_history = promises.history_for_candidate(id).await?;
    let (recent_ratings, _) = ratings
        .list_for_candidate(id, PageQuery::default().resolve(10))
        .await?;

    let (user_vote, user_rating) = match &user {
        Some(user) => (
            votes.find_for_pair(id, user.account.id).await?,
            ratings.find_for_pair(id, user.account.id).await?,
        ),
        None => (None, None),
    };

    let governorate_name = candidate.governorate_name();
    Ok(Json(CandidateDetailResponse {
        detail: CandidateDetail {
            candidate,
            governorate_name,
            stats,
            rating_distribution,
        },
        electoral_promises,
        service_history,
        recent_ratings,
        user_vote,
        user_rating,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSearchParams {
    pub q: Option<String>,
    pub governorate_id: Option<i32>,
}

/// Autocomplete over candidate name and constituency.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<CandidateSearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.trim().chars().count() < 2 {
        return Ok(Json(serde_json::json!({ "results": [] })));
    }

    let repo = CandidateRepository::new(state.pool.clone());
    let results = repo.search_hits(&query, params.governorate_id, 10).await?;

    Ok(Json(serde_json::json!({ "results": results })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub candidate: Candidate,
    pub stats: CandidateStats,
    pub rating_distribution: RatingDistribution,
    pub unread_messages: Vec<Message>,
    pub recent_ratings: Vec<Rating>,
    pub electoral_promises: Vec<ElectoralPromise>,
}

/// The candidate's own dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    user: CandidateUser,
) -> Result<impl IntoResponse, ApiError> {
    let id = user.candidate.id;

    let repo = CandidateRepository::new(state.pool.clone());
    let (candidate, stats) = repo
        .find_with_stats(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("المرشح المطلوب غير موجود".to_string()))?;

    let ratings = RatingRepository::new(state.pool.clone());
    let messages = MessageRepository::new(state.pool.clone());
    let promises = PromiseRepository::new(state.pool.clone());

    let rating_distribution = ratings.distribution(id).await?;
    let (recent_ratings, _) = ratings
        .list_for_candidate(id, PageQuery::default().resolve(10))
        .await?;
    let electoral_promises = promises.list_for_candidate(id).await?;

    // unread preview only; reading the inbox itself marks them read
    let (inbox_page, _) = messages.inbox(id, PageQuery::default().resolve(5)).await?;
    let unread_messages: Vec<Message> = inbox_page.into_iter().filter(|m| !m.is_read).collect();

    Ok(Json(DashboardResponse {
        candidate,
        stats,
        rating_distribution,
        unread_messages,
        recent_ratings,
        electoral_promises,
    }))
}

/// Candidate profile update.
pub async fn update_profile(
    State(state): State<AppState>,
    user: CandidateUser,
    meta: ClientMeta,
    Json(input): Json<UpdateCandidateInput>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CandidateRepository::new(state.pool.clone());
    let candidate = repo
        .update_profile(user.candidate.id, &input)
        .await?
        .ok_or_else(|| ApiError::NotFound("المرشح المطلوب غير موجود".to_string()))?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::CandidateUpdated,
            format!("تحديث بيانات المرشح {}", candidate.name),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Candidate, candidate.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(candidate))
}

/// The candidate's promises.
pub async fn list_promises(
    State(state): State<AppState>,
    user: CandidateUser,
) -> Result<impl IntoResponse, ApiError> {
    let promises = PromiseRepository::new(state.pool.clone())
        .list_for_candidate(user.candidate.id)
        .await?;
    Ok(Json(promises))
}

/// Adds a promise at the end of the list.
pub async fn create_promise(
    State(state): State<AppState>,
    user: CandidateUser,
    meta: ClientMeta,
    Json(input): Json<PromiseInput>,
) -> Result<impl IntoResponse, ApiError> {
    input.validate_fields().map_err(ApiError::Validation)?;

    let promise = PromiseRepository::new(state.pool.clone())
        .insert(user.candidate.id, &input)
        .await?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::PromiseCreated,
            format!("إضافة وعد انتخابي جديد: {}", promise.title),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Promise, promise.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok((StatusCode::CREATED, Json(promise)))
}

/// Edits a promise, scoped to its owner.
pub async fn update_promise(
    State(state): State<AppState>,
    user: CandidateUser,
    Path(promise_id): Path<i64>,
    meta: ClientMeta,
    Json(input): Json<PromiseInput>,
) -> Result<impl IntoResponse, ApiError> {
    input.validate_fields().map_err(ApiError::Validation)?;

    let promise = PromiseRepository::new(state.pool.clone())
        .update(promise_id, user.candidate.id, &input)
        .await?
        .ok_or_else(|| ApiError::NotFound("الوعد الانتخابي غير موجود".to_string()))?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::PromiseUpdated,
            format!("تحديث وعد انتخابي: {}", promise.title),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Promise, promise.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(promise))
}

/// Deletes a promise, scoped to its owner.
pub async fn delete_promise(
    State(state): State<AppState>,
    user: CandidateUser,
    Path(promise_id): Path<i64>,
    meta: ClientMeta,
) -> Result<impl IntoResponse, ApiError> {
    let promise = PromiseRepository::new(state.pool.clone())
        .delete(promise_id, user.candidate.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("الوعد الانتخابي غير موجود".to_string()))?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::PromiseDeleted,
            format!("حذف وعد انتخابي: {}", promise.title),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Candidate, user.candidate.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(Ack::new("تم حذف الوعد الانتخابي بنجاح")))
}

/// Adds a service-history entry.
pub async fn create_service_history(
    State(state): State<AppState>,
    user: CandidateUser,
    meta: ClientMeta,
    Json(input): Json<ServiceHistoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    input.validate_fields().map_err(ApiError::Validation)?;

    let entry = PromiseRepository::new(state.pool.clone())
        .insert_history(user.candidate.id, &input)
        .await?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::CandidateUpdated,
            format!("إضافة خبرة عمل عام: {}", entry.position),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Candidate, user.candidate.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Deletes a service-history entry.
pub async fn delete_service_history(
    State(state): State<AppState>,
    user: CandidateUser,
    Path(entry_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = PromiseRepository::new(state.pool.clone())
        .delete_history(entry_id, user.candidate.id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("السجل المطلوب غير موجود".to_string()));
    }

    Ok(Json(Ack::new("تم حذف السجل بنجاح")))
}
