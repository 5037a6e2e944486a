//! Registration, login, quick login, and session endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use validator::Validate;

use domain::identity::{resolve_quick_login, username_from_email, QuickLoginResolution};
use domain::models::{
    ActionType, Account, Candidate, Citizen, EntityKind, LoginInput, LogActivityInput,
    QuickLoginInput, RegisterCitizenInput, Role, SessionResponse, Severity, UpdateCitizenInput,
};
use persistence::repositories::{CitizenRepository, NewAccount, NewCitizen};
use shared::validation::format_egyptian_phone;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ClientMeta, CurrentUser};
use crate::routes::{first_validation_error, Ack};

/// Citizen self-registration. Creates the account identity and the
/// citizen profile in one transaction and logs the caller in.
pub async fn register(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(input): Json<RegisterCitizenInput>,
) -> Result<impl IntoResponse, ApiError> {
    input.validate().map_err(|e| first_validation_error(&e))?;
    input
        .validate_registration()
        .map_err(ApiError::Validation)?;

    let citizens = CitizenRepository::new(state.pool.clone());
    if state.accounts.email_exists(&input.email).await? || citizens.email_exists(&input.email).await?
    {
        return Err(ApiError::Validation(
            "يوجد حساب مسجل بهذا البريد الإلكتروني بالفعل".to_string(),
        ));
    }

    let username = state
        .accounts
        .next_free_username(username_from_email(&input.email))
        .await?;
    let password_hash = shared::password::hash_password(&input.password)?;
    let phone = format_egyptian_phone(&input.phone);

    let mut tx = state.pool.begin().await?;
    let account = state
        .accounts
        .insert_in_tx(
            &mut tx,
            &NewAccount {
                username,
                email: input.email.clone(),
                password_hash: Some(password_hash),
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                is_staff: false,
            },
        )
        .await?;
    let citizen = citizens
        .insert_in_tx(
            &mut tx,
            &NewCitizen {
                account_id: account.id,
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                email: input.email.clone(),
                phone_number: phone,
                governorate_id: input.governorate_id,
                area_type: input.area_type.clone(),
                area_name: input.area_name.clone(),
                address: input.address.clone(),
            },
        )
        .await?;
    tx.commit().await?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::Register,
            format!("تسجيل حساب مواطن جديد: {}", citizen.full_name()),
        )
        .with_actor(account.id)
        .with_related(EntityKind::Citizen, citizen.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    let token = state.jwt.issue(account.id)?;
    let message = format!("مرحباً {}! تم إنشاء حسابك بنجاح.", input.first_name);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            account,
            role: Role::Citizen,
            message,
        }),
    ))
}

/// Password login.
pub async fn login(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse, ApiError> {
    let failed = || ApiError::Unauthorized("اسم المستخدم أو كلمة المرور غير صحيحة".to_string());

    let account = state
        .accounts
        .find_by_username(&input.username)
        .await?
        .ok_or_else(failed)?;

    let hash = account.password_hash.clone().ok_or_else(failed)?;
    if !shared::password::verify_password(&input.password, &hash)? {
        return Err(failed());
    }
    if !account.is_active {
        return Err(ApiError::Unauthorized("هذا الحساب موقوف".to_string()));
    }

    state.accounts.touch_last_login(account.id).await?;
    finish_login(&state, account, meta, "password").await
}

/// Quick login from the landing page: exact phone plus first-name-token
/// containment. The match must be unique; an ambiguous match is refused
/// instead of silently picking a citizen.
pub async fn quick_login(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(input): Json<QuickLoginInput>,
) -> Result<impl IntoResponse, ApiError> {
    if input.citizen_name.trim().is_empty() || input.phone_number.trim().is_empty() {
        return Err(ApiError::Validation(
            "يرجى ملء جميع حقول الدخول السريع".to_string(),
        ));
    }

    let citizens = CitizenRepository::new(state.pool.clone());
    let phone = format_egyptian_phone(&input.phone_number);
    let matches = citizens.find_by_phone(&phone).await?;

    match resolve_quick_login(matches, &input.citizen_name, |c: &Citizen| c.first_name.as_str()) {
        QuickLoginResolution::Unique(citizen) => {
            let account = state
                .accounts
                .find_by_id(citizen.account_id)
                .await?
                .ok_or_else(|| ApiError::Internal("citizen without account".to_string()))?;
            if !account.is_active {
                return Err(ApiError::Unauthorized("هذا الحساب موقوف".to_string()));
            }

            state.accounts.touch_last_login(account.id).await?;
            finish_login(&state, account, meta, "quick").await
        }
        QuickLoginResolution::NoMatch => Err(ApiError::NotFound(
            "لم يتم العثور على حساب مطابق. يرجى التحقق من البيانات أو إنشاء حساب جديد.".to_string(),
        )),
        QuickLoginResolution::Ambiguous(count) => {
            state.activity.insert_detached(
                LogActivityInput::new(
                    ActionType::SecurityAlert,
                    format!(
                        "محاولة دخول سريع غامضة: {} حسابات تطابق نفس البيانات",
                        count
                    ),
                )
                .with_severity(Severity::Warning)
                .with_request_context(meta.ip_address, meta.user_agent),
            );
            Err(ApiError::Conflict(
                "تم العثور على أكثر من حساب مطابق. يرجى تسجيل الدخول باسم المستخدم وكلمة المرور."
                    .to_string(),
            ))
        }
    }
}

async fn finish_login(
    state: &AppState,
    account: Account,
    meta: ClientMeta,
    method: &str,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let role = resolve_role(state, &account).await?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::Login,
            format!("تسجيل دخول: {}", account.full_name()),
        )
        .with_actor(account.id)
        .with_related(EntityKind::Account, account.id)
        .with_extra(serde_json::json!({ "method": method }))
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    let token = state.jwt.issue(account.id)?;
    let message = "تم تسجيل الدخول بنجاح".to_string();

    Ok((
        StatusCode::OK,
        Json(SessionResponse {
            token,
            account,
            role,
            message,
        }),
    ))
}

async fn resolve_role(state: &AppState, account: &Account) -> Result<Role, ApiError> {
    if account.is_staff {
        return Ok(Role::Admin);
    }
    let candidate = persistence::repositories::CandidateRepository::new(state.pool.clone())
        .find_by_account(account.id)
        .await?;
    Ok(if candidate.is_some() {
        Role::Candidate
    } else {
        Role::Citizen
    })
}

/// Logout acknowledgment; the token is discarded client-side.
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    meta: ClientMeta,
) -> Result<impl IntoResponse, ApiError> {
    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::Logout,
            format!("تسجيل خروج: {}", user.account.full_name()),
        )
        .with_actor(user.account.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(Ack::new("تم تسجيل الخروج بنجاح")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub account: Account,
    pub role: Role,
    pub citizen: Option<Citizen>,
    pub candidate: Option<Candidate>,
}

/// The authenticated actor's account, role, and profile.
pub async fn me(user: CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        account: user.account,
        role: user.role,
        citizen: user.citizen,
        candidate: user.candidate,
    })
}

/// Citizen profile update.
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    meta: ClientMeta,
    Json(input): Json<UpdateCitizenInput>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(governorate_id) = input.governorate_id {
        if !domain::governorates::is_valid_id(governorate_id) {
            return Err(ApiError::Validation("المحافظة المطلوبة غير موجودة".to_string()));
        }
    }

    let mut input = input;
    if let Some(phone) = input.phone.as_deref() {
        shared::validation::validate_egyptian_phone(phone)
            .map_err(|_| ApiError::Validation("رقم الهاتف غير صحيح".to_string()))?;
        input.phone = Some(format_egyptian_phone(phone));
    }

    let citizens = CitizenRepository::new(state.pool.clone());
    let citizen = citizens
        .update_profile(user.account.id, &input)
        .await?
        .ok_or_else(|| ApiError::NotFound("يجب إنشاء ملف شخصي للمواطن أولاً".to_string()))?;

    state.activity.insert_detached(
        LogActivityInput::new(
            ActionType::ProfileUpdate,
            format!("تحديث الملف الشخصي: {}", citizen.full_name()),
        )
        .with_actor(user.account.id)
        .with_related(EntityKind::Citizen, citizen.id)
        .with_request_context(meta.ip_address, meta.user_agent),
    );

    Ok(Json(citizen))
}
