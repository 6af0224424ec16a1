//! Current-user handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;

/// Routes for the authenticated caller's own account
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/become-host", post(become_host))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Promote the caller to host. Repeating it is harmless.
#[utoipa::path(
    post,
    path = "/api/become-host",
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller is now a host", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn become_host(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.promote_to_host(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}
