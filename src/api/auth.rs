use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::observability::RequestUser;
use super::{ApiError, AppState};
use crate::domain::User;

/// Header carrying the session token in both directions.
pub const AUTH_HEADER: HeaderName = HeaderName::from_static("x-auth");

/// Set by [`auth_middleware`] on every request it lets through.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// The raw token the request was authenticated with.
    pub token: String,
}

/// Resolves the `x-auth` header to a user with a live session, or answers 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing x-auth header"))?;

    let user = state.user_service.authenticate(&token).await?;
    let user_id = user.id.clone();
    tracing::debug!(%user_id, "Authenticated request");

    request
        .extensions_mut()
        .insert(CurrentUser { user, token });

    let mut response = next.run(request).await;
    response.extensions_mut().insert(RequestUser(user_id));
    Ok(response)
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(&AUTH_HEADER)?.to_str().ok()?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(&AUTH_HEADER, HeaderValue::from_static("  "));
        assert_eq!(extract_token(&headers), None);

        headers.insert(&AUTH_HEADER, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }
}
