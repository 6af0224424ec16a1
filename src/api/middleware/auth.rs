//! Session authentication middleware and the role gate.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, SESSION_COOKIE_NAME};
use crate::domain::UserRole;
use crate::errors::AppError;

/// Caller identity attached to the request by [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
    pub session_token: String,
}

/// Session token from the `session-id` cookie, falling back to a bearer header.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Session authentication middleware.
///
/// Resolves the session token to a user and injects [`CurrentUser`] into the
/// request extensions. Never touches session state.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let user = state.auth_service.authenticate(&token).await?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        role: user.role,
        session_token: token,
    });

    Ok(next.run(request).await)
}

/// Permit the caller only when their role is in `allowed`.
pub fn authorize(user: &CurrentUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.id, role = %user.role, "Role not permitted");
        Err(AppError::Forbidden)
    }
}

/// Host-only gate. Must be layered inside [`auth_middleware`].
pub async fn require_host(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    authorize(user, &[UserRole::Host])?;

    Ok(next.run(request).await)
}
