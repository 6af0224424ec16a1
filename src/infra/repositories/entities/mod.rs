//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod attendance;
pub mod event;
pub mod event_tag;
pub mod session;
pub mod tag;
pub mod user;

pub use attendance::Entity as AttendanceEntity;
pub use event::Entity as EventEntity;
pub use event_tag::Entity as EventTagEntity;
pub use session::Entity as SessionEntity;
pub use tag::Entity as TagEntity;
pub use user::Entity as UserEntity;
