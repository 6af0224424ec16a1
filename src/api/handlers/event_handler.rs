//! Event handlers: public listing, detail, attendance and host operations.

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query, State},
    middleware,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_host, CurrentUser};
use crate::api::AppState;
use crate::domain::{normalize_tag_names, Event, EventFilter, NewEvent};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, NoContent, Pagination, PaginationParams, StatusResponse};

/// Event creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Event name must be 1 to 200 characters"))]
    #[schema(example = "Jazz in the Park")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339 timestamp
    #[schema(example = "2025-07-01T19:00:00Z")]
    pub date: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
    #[validate(range(min = 0.0, message = "Fee must be a non-negative amount"))]
    pub fee: f64,
    /// Names of existing tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateEventRequest {
    fn into_new_event(self) -> AppResult<NewEvent> {
        let date = DateTime::parse_from_rfc3339(self.date.trim())
            .map_err(|_| AppError::validation("Date must be an RFC 3339 timestamp"))?
            .with_timezone(&Utc);

        Ok(NewEvent {
            name: self.name,
            description: self.description,
            date,
            latitude: self.latitude,
            longitude: self.longitude,
            fee: self.fee,
            tags: self.tags,
        })
    }
}

/// Query string for the public event listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventQuery {
    /// Inclusive lower bound, RFC 3339 or YYYY-MM-DD
    pub date_from: Option<String>,
    /// Inclusive upper bound, RFC 3339 or YYYY-MM-DD (end of that day)
    pub date_to: Option<String>,
    pub min_fee: Option<f64>,
    pub max_fee: Option<f64>,
    /// Comma separated tag names; matches events carrying any of them
    pub tags: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl EventQuery {
    fn into_filter(self) -> AppResult<EventFilter> {
        let date_from = self
            .date_from
            .as_deref()
            .map(|raw| parse_date_bound(raw, false))
            .transpose()?;
        let date_to = self
            .date_to
            .as_deref()
            .map(|raw| parse_date_bound(raw, true))
            .transpose()?;

        for fee in [self.min_fee, self.max_fee].into_iter().flatten() {
            if !fee.is_finite() {
                return Err(AppError::bad_request("fee bounds must be finite numbers"));
            }
        }

        let tags = self
            .tags
            .as_deref()
            .map(|raw| normalize_tag_names(raw.split(',')))
            .unwrap_or_default();

        let pagination = PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
        .into_pagination()?;

        Ok(EventFilter {
            date_from,
            date_to,
            min_fee: self.min_fee,
            max_fee: self.max_fee,
            tags,
            pagination,
        })
    }
}

/// Parse an RFC 3339 instant or a bare date. A bare upper bound covers the whole day.
fn parse_date_bound(raw: &str, end_of_day: bool) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let invalid = || AppError::bad_request(format!("invalid date '{}'", raw));
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    let moment = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };

    moment.map(|m| m.and_utc()).ok_or_else(invalid)
}

/// Event with the caller's view of its attendance
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: Event,
    pub attendees_count: usize,
    pub user_registered: bool,
}

/// The caller's events on both sides
#[derive(Debug, Serialize, ToSchema)]
pub struct MyEventsResponse {
    pub hosting: Vec<Event>,
    pub attending: Vec<Event>,
}

/// Public event routes
pub fn event_routes() -> Router<AppState> {
    Router::new().route("/events", get(list_events))
}

/// Event routes for authenticated callers; creation and deletion are host-only
pub fn attendee_event_routes() -> Router<AppState> {
    let host_only = || middleware::from_fn(require_host);

    Router::new()
        .route("/my-events", get(my_events))
        .route("/events/add", post(create_event).route_layer(host_only()))
        .route(
            "/events/:id",
            get(get_event).merge(delete(delete_event).route_layer(host_only())),
        )
        .route("/events/:id/register", post(register_attendance))
        .route("/events/:id/unregister", delete(remove_attendance))
}

/// List events, optionally filtered
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(EventQuery),
    responses(
        (status = 200, description = "Matching events ordered by date", body = Vec<Event>),
        (status = 400, description = "Unparseable filter value")
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<EventQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Event>>> {
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    let filter = query.into_filter()?;

    let events = if !filter.has_predicates() && filter.pagination.is_none() {
        state.event_service.list_events().await?
    } else {
        state.event_service.get_events_with_filters(filter).await?
    };

    Ok(Json(events))
}

/// Create an event (hosts only)
#[utoipa::path(
    post,
    path = "/api/events/add",
    tag = "Events",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid event"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a host"),
        (status = 404, description = "Unknown tag")
    )
)]
pub async fn create_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> AppResult<Created<Event>> {
    let input = payload.into_new_event()?;
    let event = state
        .event_service
        .create_event(current_user.id, input)
        .await?;

    Ok(Created(event))
}

/// Event detail with attendance summary
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event detail", body = EventDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventDetailResponse>> {
    let event = state.event_service.get_event(id).await?;
    let attendees = state.event_service.get_attendees(id).await?;

    Ok(Json(EventDetailResponse {
        event,
        attendees_count: attendees.len(),
        user_registered: attendees.contains(&current_user.id),
    }))
}

/// Delete an event (its organizer only)
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a host, or not the organizer"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.event_service.delete_event(current_user.id, id).await?;
    Ok(NoContent)
}

/// Register the caller for an event
#[utoipa::path(
    post,
    path = "/api/events/{id}/register",
    tag = "Attendance",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registered", body = StatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Already registered")
    )
)]
pub async fn register_attendance(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StatusResponse>> {
    state
        .event_service
        .register_attendance(current_user.id, id)
        .await?;
    Ok(StatusResponse::ok())
}

/// Withdraw the caller's registration. Succeeds when not registered.
#[utoipa::path(
    delete,
    path = "/api/events/{id}/unregister",
    tag = "Attendance",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Not registered any more", body = StatusResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn remove_attendance(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StatusResponse>> {
    state
        .event_service
        .remove_attendance(current_user.id, id)
        .await?;
    Ok(StatusResponse::ok())
}

/// Events the caller hosts and attends
#[utoipa::path(
    get,
    path = "/api/my-events",
    tag = "Attendance",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Hosting and attending events", body = MyEventsResponse),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_events(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> AppResult<Json<MyEventsResponse>> {
    let Query(params) = params.map_err(|e| AppError::bad_request(e.body_text()))?;
    let pagination: Option<Pagination> = params.into_pagination()?;

    let (hosting, attending) = tokio::try_join!(
        state.event_service.get_hosting_events(current_user.id, pagination),
        state.event_service.get_attending_events(current_user.id, pagination),
    )?;

    Ok(Json(MyEventsResponse { hosting, attending }))
}
