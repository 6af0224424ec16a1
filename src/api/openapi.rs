//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, event_handler, tag_handler, user_handler};
use crate::domain::{Event, Tag, UserResponse, UserRole};
use crate::types::StatusResponse;

/// OpenAPI documentation for the Convenly API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Convenly API",
        version = "0.1.0",
        description = "Event discovery and RSVP: sessions, hosts, events and attendance",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        user_handler::get_current_user,
        user_handler::become_host,
        event_handler::list_events,
        event_handler::create_event,
        event_handler::get_event,
        event_handler::delete_event,
        event_handler::register_attendance,
        event_handler::remove_attendance,
        event_handler::my_events,
        tag_handler::list_tags,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            Event,
            Tag,
            StatusResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            event_handler::CreateEventRequest,
            event_handler::EventDetailResponse,
            event_handler::MyEventsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and logout"),
        (name = "Users", description = "The caller's own account"),
        (name = "Events", description = "Event catalog and host operations"),
        (name = "Attendance", description = "Registering for events")
    )
)]
pub struct ApiDoc;

/// Session cookie and bearer schemes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                    crate::config::SESSION_COOKIE_NAME,
                ))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Session token returned in the session-id cookie"))
                        .build(),
                ),
            );
        }
    }
}
