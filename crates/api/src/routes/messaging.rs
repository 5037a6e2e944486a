//! Messaging endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use validator::ValidateEmail;

use domain::models::{
    ActionType, EntityKind, LogActivityInput, Message, MessageThread, Notification,
    ReplyMessageInput, SendMessageInput,
};
use persistence::repositories::{
    CandidateRepository, MessageRepository, NewMessage, RatingRepository,
};
use shared::pagination::{PageQuery, Paginated};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CandidateUser, ClientMeta, CurrentUser, OptionalUser};

/// Sends a message to a candidate. Logged-in senders are identified by
/// their account; anonymous senders must supply a name and a valid email.
pub async fn send(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    OptionalUser(user): OptionalUser,
    meta: ClientMeta,
    Json(input): Json<SendMessageInput>,
) -> Result<impl IntoResponse, ApiError> {
    input.validate_fields().map_err(ApiError::Validation)?;

    let candidates = CandidateRepository::new(state.pool.clone());
    let candidate = candidates
        .find_by_id(candidate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("المرشح المطلوب غير موجود".to_string()))?;

    let (sender_account_id, sender_name, sender_email) = match &user {
        Some(user) => (
            Some(user.account.id),
            user.account.full_name(),
            user.account.email.clone(),
        ),
        None => {
            let name = input
                .sender_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ApiError::Validation("يرجى إدخال اسم المرسل".to_string())
                })?;
            let email = input
                .sender_email
                .as_deref()
                .map(str::trim)
                .filter(|e| e.validate_email())
                .ok_or_else(|| {
                    ApiError::Validation("البريد الإلكتروني غير صحيح".to_string())
                })?;
            (None, name.to_string(), email.to_string())
        }
    };

    let messages = MessageRepository::new(state.pool.clone());
    let message = messages
        .insert(&NewMessage {
            candidate_id,
            sender_account_id,
            sender_name,
            sender_email,
            subject: input.subject.trim().to_string(),
            content: input.content.trim().to_string(),
            attachment: input.attachment.clone(),
        })
        .await?;

    let mut log = LogActivityInput::new(
        ActionType::MessageSent,
        format!(
            "إرسال رسالة للمرشح {}: {}",
            candidate.name, message.subject
        ),
    )
    .with_related(EntityKind::Message, message.id)
    .with_request_context(meta.ip_address, meta.user_agent);
    if let Some(user) = &user {
        log = log.with_actor(user.account.id);
    }
    state.activity.insert_detached(log);

    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxResponse {
    #[serde(flatten)]
    pub page: Paginated<Message>,
    pub marked_read: u64,
}

/// The candidate's inbox. Opening it marks every unread message read —
/// the mark-read effect is a separate repository operation triggered
/// here, mirrored in the response for visibility.
pub async fn inbox(
    State(state): State<AppState>,
    user: CandidateUser,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = MessageRepository::new(state.pool.clone());
    let window = page.resolve(10);

    let (items, total) = messages.inbox(user.candidate.id, window).await?;
    let marked_read = messages.mark_inbox_read(user.candidate.id).await?;

    Ok(Json(InboxResponse {
        page: Paginated::new(items, window, total),
        marked_read,
    }))
}

/// A message thread: the original and its replies. Visible to the sender
/// and to the candidate it was addressed to.
pub async fn thread(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    user: CurrentUser,
) -> Result<Json<MessageThread>, ApiError> {
    let messages = MessageRepository::new(state.pool.clone());
    let thread = messages
        .thread(message_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("الرسالة المطلوبة غير موجودة".to_string()))?;

    let is_sender = thread.message.sender_account_id == Some(user.account.id);
    let is_recipient = user
        .candidate
        .as_ref()
        .map(|c| c.id == thread.message.candidate_id)
        .unwrap_or(false);

    if !is_sender && !is_recipient {
        return Err(ApiError::Forbidden(
            "ليس لديك صلاحية لعرض هذه الرسالة".to_string(),
        ));
    }

    Ok(Json(thread))
}

/// Replies to a message. Only the candidate the message was addressed to
/// may reply; the reply references the original and marks it read.
pub async fn reply(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    user: CandidateUser,
    meta: ClientMeta,
    Json(input): Json<ReplyMessageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let content = input.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("يرجى كتابة محتوى الرد".to_string()));
    }

    let messages = MessageRepository::new(state.pool.clone());
    let original = messages
        .find_by_id(message_id)
        .await?
        .filter(|m| m.candidate_id == user.candidate.id)
        .ok_or_else(|| {
            ApiError::Forbidden("ليس لديك صلاحية للرد على هذه الرسالة".to_string())
        })?;

    let reply = messages
        .insert_reply(
            &original,
            user.account.id,
            &user.candidate.name,
            &user.account.email,
            content,
        )
        .await?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::MessageReply,
            format!("رد على رسالة: {}", original.subject),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Message, reply.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok((StatusCode::CREATED, Json(reply)))
}

/// Messages the authenticated account has sent.
pub async fn sent(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = MessageRepository::new(state.pool.clone())
        .sent_by_account(user.account.id)
        .await?;
    Ok(Json(messages))
}

/// Notification poll: unread message and rating counts for candidates.
pub async fn notifications(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut notifications: Vec<Notification> = Vec::new();

    if let Some(user) = user {
        if let Some(candidate) = user.candidate {
            let messages = MessageRepository::new(state.pool.clone());
            let unread = messages.unread_count_for_candidate(candidate.id).await?;
            if unread > 0 {
                notifications.push(Notification {
                    kind: "message".to_string(),
                    count: unread,
                    text: format!("لديك {} رسالة جديدة", unread),
                    url: "/candidate/messages".to_string(),
                });
            }

            let ratings = RatingRepository::new(state.pool.clone());
            let unread_ratings = ratings.unread_count_for_candidate(candidate.id).await?;
            if unread_ratings > 0 {
                notifications.push(Notification {
                    kind: "rating".to_string(),
                    count: unread_ratings,
                    text: format!("لديك {} تقييم جديد", unread_ratings),
                    url: "/candidate/ratings".to_string(),
                });
            }
        }
    }

    Ok(Json(serde_json::json!({ "notifications": notifications })))
}
