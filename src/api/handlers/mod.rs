//! HTTP request handlers.

pub mod auth_handler;
pub mod event_handler;
pub mod tag_handler;
pub mod user_handler;

pub use auth_handler::{auth_routes, session_routes};
pub use event_handler::{attendee_event_routes, event_routes};
pub use tag_handler::tag_routes;
pub use user_handler::user_routes;
