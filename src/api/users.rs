use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::{AUTH_HEADER, CurrentUser};
use super::validation::require_field;
use super::{ApiError, AppState, CredentialsRequest};
use crate::domain::User;
use crate::services::Session;

fn session_response(session: Session) -> Result<impl IntoResponse, ApiError> {
    let token = HeaderValue::from_str(&session.token)
        .map_err(|e| ApiError::internal(format!("Token is not a valid header value: {e}")))?;

    Ok(([(AUTH_HEADER, token)], Json(session.user)))
}

/// POST /users
/// Registers an account and returns it with a fresh token in `x-auth`.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let email = require_field(payload.email, "email")?;
    let password = require_field(payload.password, "password")?;

    let session = state.user_service.register(&email, &password).await?;
    session_response(session)
}

/// POST /users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    // Missing fields fail the same way a wrong password does
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let session = state.user_service.login(&email, &password).await?;
    session_response(session)
}

/// GET /users/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}

/// DELETE /users/me/token
/// Revokes the token the request was made with.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .logout(&current.user, &current.token)
        .await?;

    Ok(StatusCode::OK)
}
