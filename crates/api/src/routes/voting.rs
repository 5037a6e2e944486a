//! Voting and rating endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::str::FromStr;

use domain::models::{
    ActionType, CastVoteInput, EntityKind, LogActivityInput, RateCandidateInput, Rating,
    RatingDistribution, RatingOutcome, RatingReply, RatingReplyInput, Vote, VoteOutcome, VoteType,
};
use persistence::repositories::{CandidateRepository, RatingRepository, VoteRepository};
use shared::pagination::{PageQuery, Paginated};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CandidateUser, ClientMeta, CurrentUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub outcome: VoteOutcome,
    pub message: String,
}

/// Submits an approve/disapprove vote for a candidate. Same type twice
/// toggles the vote off; the opposite type flips it.
pub async fn vote(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    user: CurrentUser,
    meta: ClientMeta,
    Json(input): Json<CastVoteInput>,
) -> Result<impl IntoResponse, ApiError> {
    let vote_type = VoteType::from_str(&input.vote_type)
        .map_err(|_| ApiError::Validation("نوع التصويت غير صحيح".to_string()))?;

    let candidates = CandidateRepository::new(state.pool.clone());
    let candidate = candidates
        .find_by_id(candidate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("المرشح المطلوب غير موجود".to_string()))?;

    let votes = VoteRepository::new(state.pool.clone());
    let outcome = votes
        .submit(candidate_id, user.account.id, vote_type)
        .await?;

    let (action, description, message) = match outcome {
        VoteOutcome::Cast => (
            ActionType::VoteCast,
            format!("تصويت {} للمرشح {}", vote_type.label_ar(), candidate.name),
            format!("تم تسجيل تصويتك: \"{}\"", vote_type.label_ar()),
        ),
        VoteOutcome::Updated => (
            ActionType::VoteUpdated,
            format!(
                "تحديث التصويت إلى {} للمرشح {}",
                vote_type.label_ar(),
                candidate.name
            ),
            format!("تم تحديث تصويتك إلى \"{}\"", vote_type.label_ar()),
        ),
        VoteOutcome::Removed => (
            ActionType::VoteRemoved,
            format!(
                "إلغاء تصويت {} للمرشح {}",
                vote_type.label_ar(),
                candidate.name
            ),
            "تم إلغاء تصويتك".to_string(),
        ),
    };

    state.activity.insert_detached(
        LogActivityInput::new(action, description)
            .with_actor(user.account.id)
            .with_related(EntityKind::Candidate, candidate.id)
            .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(VoteResponse { outcome, message }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    pub outcome: RatingOutcome,
    pub rating: Rating,
    pub message: String,
}

/// Submits a 1-5 star rating with an optional comment; a second
/// submission for the same pair overwrites the first.
pub async fn rate(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    user: CurrentUser,
    meta: ClientMeta,
    Json(input): Json<RateCandidateInput>,
) -> Result<impl IntoResponse, ApiError> {
    let stars = input.parse_stars().map_err(ApiError::Validation)?;

    let candidates = CandidateRepository::new(state.pool.clone());
    let candidate = candidates
        .find_by_id(candidate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("المرشح المطلوب غير موجود".to_string()))?;

    let ratings = RatingRepository::new(state.pool.clone());
    let (rating, outcome) = ratings
        .upsert(candidate_id, user.account.id, stars, input.comment.trim())
        .await?;

    let (action, message) = match outcome {
        RatingOutcome::Created => (ActionType::RatingGiven, "تم إضافة تقييمك بنجاح"),
        RatingOutcome::Updated => (ActionType::RatingUpdated, "تم تحديث تقييمك بنجاح"),
    };

    state.activity.insert_detached(
        LogActivityInput::new(
            action,
            format!("تقييم {} نجوم للمرشح {}", stars, candidate.name),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Rating, rating.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(RateResponse {
        outcome,
        rating,
        message: message.to_string(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsVotesResponse {
    pub ratings: Paginated<Rating>,
    pub rating_distribution: RatingDistribution,
    pub recent_votes: Vec<Vote>,
    pub approval_percentage: f64,
}

/// The candidate's own ratings-and-votes monitoring page.
pub async fn ratings_votes(
    State(state): State<AppState>,
    user: CandidateUser,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = user.candidate.id;
    let ratings_repo = RatingRepository::new(state.pool.clone());
    let votes_repo = VoteRepository::new(state.pool.clone());
    let candidates = CandidateRepository::new(state.pool.clone());

    let window = page.resolve(5);
    let (page_ratings, total) = ratings_repo.list_for_candidate(id, window).await?;
    let rating_distribution = ratings_repo.distribution(id).await?;
    let recent_votes = votes_repo.list_for_candidate(id, 20).await?;

    let (_, stats) = candidates
        .find_with_stats(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("المرشح المطلوب غير موجود".to_string()))?;

    Ok(Json(RatingsVotesResponse {
        ratings: Paginated::new(page_ratings, window, total),
        rating_distribution,
        recent_votes,
        approval_percentage: stats.approval_percentage(),
    }))
}

/// Replies to a rating. Reading a rating to reply marks it read, and a
/// new reply replaces any previous one.
pub async fn reply_to_rating(
    State(state): State<AppState>,
    user: CandidateUser,
    Path(rating_id): Path<i64>,
    meta: ClientMeta,
    Json(input): Json<RatingReplyInput>,
) -> Result<Json<RatingReply>, ApiError> {
    if input.content.trim().is_empty() {
        return Err(ApiError::Validation("يرجى كتابة محتوى الرد".to_string()));
    }

    let ratings = RatingRepository::new(state.pool.clone());
    let rating = ratings
        .find_by_id(rating_id)
        .await?
        .filter(|r| r.candidate_id == user.candidate.id)
        .ok_or_else(|| ApiError::NotFound("لم يتم العثور على التقييم".to_string()))?;

    if !rating.is_read {
        ratings.mark_read(rating.id).await?;
    }

    let reply = ratings
        .replace_reply(rating.id, user.candidate.id, input.content.trim())
        .await?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::MessageReply,
            format!("رد المرشح {} على تقييم", user.candidate.name),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Rating, rating.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(reply))
}
