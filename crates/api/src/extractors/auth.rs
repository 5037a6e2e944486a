//! Authentication extractors.
//!
//! The actor's role is resolved exactly once per request — token, account
//! row, then profile rows — and handlers receive the resolved
//! [`CurrentUser`] explicitly instead of probing for profiles themselves.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{Account, Candidate, Citizen, Role};
use persistence::repositories::{CandidateRepository, CitizenRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// The authenticated actor with their role and profile, resolved once.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account: Account,
    pub role: Role,
    pub citizen: Option<Citizen>,
    pub candidate: Option<Candidate>,
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("يرجى تسجيل الدخول أولاً".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("جلسة غير صالحة".to_string()))
}

async fn resolve_user(state: &AppState, token: &str) -> Result<CurrentUser, ApiError> {
    let claims = state.jwt.verify(token)?;

    let account = state
        .accounts
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("جلسة غير صالحة".to_string()))?;

    if !account.is_active {
        return Err(ApiError::Unauthorized("هذا الحساب موقوف".to_string()));
    }

    let candidate = CandidateRepository::new(state.pool.clone())
        .find_by_account(account.id)
        .await?;
    let citizen = CitizenRepository::new(state.pool.clone())
        .find_by_account(account.id)
        .await?;

    let role = if account.is_staff {
        Role::Admin
    } else if candidate.is_some() {
        Role::Candidate
    } else {
        Role::Citizen
    };

    Ok(CurrentUser {
        account,
        role,
        citizen,
        candidate,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        resolve_user(state, token).await
    }
}

/// Optional authentication for endpoints that adapt to logged-in users
/// without requiring them.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Ok(token) => Ok(OptionalUser(resolve_user(state, token).await.ok())),
            Err(_) => Ok(OptionalUser(None)),
        }
    }
}

/// An authenticated staff member.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(ApiError::Forbidden(
                "ليس لديك صلاحية للوصول لهذه الصفحة".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

/// An authenticated account with a candidate profile.
#[derive(Debug, Clone)]
pub struct CandidateUser {
    pub account: Account,
    pub candidate: Candidate,
}

#[async_trait]
impl FromRequestParts<AppState> for CandidateUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        match user.candidate {
            Some(candidate) => Ok(CandidateUser {
                account: user.account,
                candidate,
            }),
            None => Err(ApiError::Forbidden(
                "هذا الحساب غير مخصص للمرشحين".to_string(),
            )),
        }
    }
}
