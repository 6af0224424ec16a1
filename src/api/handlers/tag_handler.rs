//! Tag handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::AppState;
use crate::domain::Tag;
use crate::errors::AppResult;

pub fn tag_routes() -> Router<AppState> {
    Router::new().route("/tags", get(list_tags))
}

/// List every tag, ordered by name
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "Events",
    responses((status = 200, description = "All tags", body = Vec<Tag>))
)]
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    Ok(Json(state.event_service.list_tags().await?))
}
