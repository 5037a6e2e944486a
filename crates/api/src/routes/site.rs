//! Public site surface: landing-page data, contact form, robots.txt.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use validator::ValidateEmail;

use domain::models::{ActionType, LogActivityInput};
use persistence::repositories::{CandidateRepository, NewsRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ClientMeta, OptionalUser};
use crate::routes::Ack;

/// Landing-page data: featured candidates and the ticker feed.
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let candidates = CandidateRepository::new(state.pool.clone());
    let news = NewsRepository::new(state.pool.clone());

    let featured = candidates.featured(6).await?;
    let ticker = news.ticker(5).await?;

    Ok(Json(serde_json::json!({
        "featuredCandidates": featured,
        "latestNews": ticker,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Contact form; the submission is recorded on the activity log.
pub async fn contact(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    meta: ClientMeta,
    Json(input): Json<ContactInput>,
) -> Result<impl IntoResponse, ApiError> {
    if input.name.trim().is_empty()
        || input.subject.trim().is_empty()
        || input.message.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "يرجى ملء جميع الحقول المطلوبة".to_string(),
        ));
    }
    if !input.email.validate_email() {
        return Err(ApiError::Validation("البريد الإلكتروني غير صحيح".to_string()));
    }

    let mut log = LogActivityInput::new(
        ActionType::ContactForm,
        format!(
            "رسالة اتصال من {} ({}): {}",
            input.name, input.email, input.subject
        ),
    )
    .with_extra(serde_json::json!({
        "name": input.name,
        "email": input.email,
        "subject": input.subject,
        "message": input.message,
    }))
    .with_request_context(meta.ip_address, meta.user_agent);
    if let Some(user) = &user {
        log = log.with_actor(user.account.id);
    }
    state.activity.insert_detached(log);

    Ok(Json(Ack::new("تم إرسال رسالتك بنجاح. سنتواصل معك قريباً.")))
}

/// robots.txt
pub async fn robots_txt() -> impl IntoResponse {
    let lines = [
        "User-agent: *",
        "Allow: /",
        "Disallow: /admin/",
        "Disallow: /candidate/",
        "",
        "Sitemap: https://naebak.com/sitemap.xml",
    ];
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain")],
        lines.join("\n"),
    )
}
