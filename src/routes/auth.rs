//! Authentication routes: register, login, refresh, logout, profile.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::{CurrentUser, MaybeUser};
use crate::models::user::{MemberResponse, RegisterUser, UserRole};
use crate::services::auth::{self as auth_service, AuthResponse, TokenPair, TokenSettings};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Portal the user is signing in through; must match the account role.
    pub login_type: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    /// Revoked alongside the access token so the session cannot be renewed.
    pub refresh_token: Option<String>,
}

fn token_settings(state: &AppState) -> TokenSettings<'_> {
    TokenSettings {
        secret: &state.config.jwt_secret,
        access_expiry_secs: state.config.jwt_access_token_expiry_secs,
        refresh_expiry_secs: state.config.jwt_refresh_token_expiry_secs,
    }
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    MaybeUser(requester): MaybeUser,
    Json(body): Json<RegisterUser>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let requested_by = requester.map(|u| u.role);
    let user = auth_service::register(&state.db, &body, requested_by).await?;
    let tokens = auth_service::generate_tokens(&user, token_settings(&state))?;

    Ok(ApiResponse::success(AuthResponse {
        tokens,
        user: user.into(),
    }))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let (user, tokens) = auth_service::login(
        &state.db,
        &body.email,
        &body.password,
        body.login_type,
        token_settings(&state),
    )
    .await?;

    Ok(ApiResponse::success(AuthResponse {
        tokens,
        user: user.into(),
    }))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = auth_service::refresh_token(
        &state.db,
        state.redis.as_ref(),
        &body.refresh_token,
        token_settings(&state),
    )
    .await?;
    Ok(ApiResponse::success(tokens))
}

/// POST /api/v1/auth/logout
///
/// Revokes the presented access token, and the refresh token from the body,
/// when a Redis blocklist is configured. Without one, the client discarding
/// its session is the whole logout. A refresh token that is not the caller's
/// is refused either way.
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
    body: Option<Json<LogoutRequest>>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let refresh = body
        .refresh_token
        .as_deref()
        .map(|token| {
            auth_service::logout_refresh_claims(token, current_user.id, &state.config.jwt_secret)
                .map(|claims| (token, claims.exp))
        })
        .transpose()?;

    if let Some(redis) = &state.redis {
        auth_service::revoke_token(redis, &current_user.token, current_user.expires_at).await?;
        if let Some((token, expires_at)) = refresh {
            auth_service::revoke_token(redis, token, expires_at).await?;
        }
        tracing::info!(
            user_id = %current_user.id,
            refresh_revoked = refresh.is_some(),
            "Session tokens revoked"
        );
    }
    Ok(ApiResponse::success("Logged out successfully"))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<MemberResponse>>, AppError> {
    let user = auth_service::find_user_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(MemberResponse::from(user)))
}
