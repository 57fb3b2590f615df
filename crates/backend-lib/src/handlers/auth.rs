//! Account handlers.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use jobboard_common::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse, MessageResponse,
    RegisterRequest, RegisterResponse, ResetPasswordRequest,
};

use crate::auth::RequestIdentity;
use super::AppJson;
use crate::error::AppError;
use crate::AppState;

/// `POST /register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = state.auth.register(&req.name, &req.email, &req.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully!".to_string(),
            user: user.profile(),
        }),
    ))
}

/// `POST /login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(LoginResponse {
        message: "Login successful!".to_string(),
        token: outcome.token,
        role: outcome.role,
        user: outcome.user,
    }))
}

/// `POST /reset-password`. Unauthenticated: knowing the email is enough.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth.reset_password(&req.email, &req.new_password).await?;
    Ok(Json(MessageResponse::new("Password reset successful")))
}

/// `POST /change-password`
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    RequestIdentity(identity): RequestIdentity,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .change_password(&identity, &req.old_password, &req.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// `GET /me`
pub async fn me(
    State(state): State<Arc<AppState>>,
    RequestIdentity(identity): RequestIdentity,
) -> Result<Json<MeResponse>, AppError> {
    Ok(Json(state.auth.resolve_self(&identity).await?))
}
