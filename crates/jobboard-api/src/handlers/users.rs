//! Registration, login, logout and profile handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use jobboard_models::{validate_login, validate_profile_update, validate_register, PublicUser, User};
use jobboard_mongo::UserRepo;

use crate::auth::{clear_session_cookie, issue_token, session_cookie, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::FormPayload;
use crate::handlers::MessageResponse;
use crate::state::AppState;

/// Work factor for bcrypt password hashing.
const BCRYPT_COST: u32 = 10;

/// Envelope carrying a sanitized user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: PublicUser,
    pub success: bool,
}

/// POST /api/v1/user/register
pub async fn register(
    State(state): State<AppState>,
    payload: FormPayload,
) -> ApiResult<impl IntoResponse> {
    let input = validate_register(&payload.fields)?;

    let users = UserRepo::new(&state.db);
    if users.find_by_email(&input.email).await?.is_some() {
        return Err(ApiError::bad_request("User already exists with this email."));
    }

    let mut profile_photo = String::new();
    if let Some(file) = payload.file {
        profile_photo = state
            .storage
            .upload_attachment(&file.filename, file.data, &file.content_type)
            .await
            .map_err(|e| {
                warn!("Profile photo upload failed: {}", e);
                ApiError::upload("Error uploading profile photo")
            })?;
    }

    let password_hash = bcrypt::hash(&input.password, BCRYPT_COST)
        .map_err(|e| ApiError::internal(format!("Password hashing failed: {}", e)))?;

    let user = User::new(
        input.fullname,
        input.email,
        input.phone_number,
        password_hash,
        input.role,
        profile_photo,
    );

    // The unique email index settles the check-then-create race.
    users.insert(&user).await.map_err(|e| {
        if e.is_duplicate_key() {
            ApiError::bad_request("User already exists with this email.")
        } else {
            e.into()
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Account created successfully.")),
    ))
}

/// POST /api/v1/user/login
///
/// Unknown email and wrong password return the same message; a role
/// mismatch is reported separately.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: FormPayload,
) -> ApiResult<impl IntoResponse> {
    let input = validate_login(&payload.fields)?;

    let users = UserRepo::new(&state.db);
    let user = users
        .find_by_email(&input.email)
        .await?
        .ok_or_else(|| ApiError::bad_request("Incorrect email or password."))?;

    let password_matches = bcrypt::verify(&input.password, &user.password)
        .map_err(|e| ApiError::internal(format!("Password verification failed: {}", e)))?;
    if !password_matches {
        return Err(ApiError::bad_request("Incorrect email or password."));
    }

    if input.role != user.role.as_str() {
        return Err(ApiError::bad_request("Account doesn't exist with current role."));
    }

    let token = issue_token(&user.id, &state.config.jwt_secret)?;
    let jar = jar.add(session_cookie(token));

    Ok((
        jar,
        Json(UserResponse {
            message: format!("Welcome back {}", user.fullname),
            user: user.public(),
            success: true,
        }),
    ))
}

/// GET /api/v1/user/logout
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(clear_session_cookie());
    (jar, Json(MessageResponse::new("Logged out successfully.")))
}

/// POST /api/v1/user/profile/update
///
/// Partial update: only supplied fields change, a supplied skills list
/// replaces the old one wholesale, and an attached file becomes the new
/// resume.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: FormPayload,
) -> ApiResult<impl IntoResponse> {
    let input = validate_profile_update(&payload.fields)?;

    let users = UserRepo::new(&state.db);
    let mut user = users
        .find_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    if let Some(ref email) = input.email {
        if users.email_taken_by_other(email, &user.id).await? {
            return Err(ApiError::bad_request("Email already taken"));
        }
    }

    if let Some(file) = payload.file {
        let filename = file.filename.clone();
        let url = state
            .storage
            .upload_attachment(&file.filename, file.data, &file.content_type)
            .await
            .map_err(|e| {
                warn!("Resume upload failed: {}", e);
                ApiError::upload("Error uploading file")
            })?;
        user.profile.resume = Some(url);
        user.profile.resume_original_name = Some(filename);
    }

    if let Some(fullname) = input.fullname {
        user.fullname = fullname;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(phone_number) = input.phone_number {
        user.phone_number = phone_number;
    }
    if let Some(bio) = input.bio {
        user.profile.bio = Some(bio);
    }
    if let Some(skills) = input.skills {
        user.profile.skills = skills;
    }
    user.updated_at = Utc::now();

    users.save(&user).await.map_err(|e| {
        if e.is_duplicate_key() {
            ApiError::bad_request("Email already taken")
        } else {
            e.into()
        }
    })?;

    Ok(Json(UserResponse {
        message: "Profile updated successfully.".to_string(),
        user: user.public(),
        success: true,
    }))
}
