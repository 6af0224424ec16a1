//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They reach the stores through the Unit of Work.

mod auth_service;
pub mod container;
mod event_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator};
pub use event_service::{EventManager, EventService};
pub use user_service::{UserManager, UserService};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::infra::{
        EventRepository, MockEventRepository, MockSessionRepository, MockTagRepository,
        MockUserRepository, SessionRepository, TagRepository, UnitOfWork, UserRepository,
    };

    /// Unit of Work handing out preconfigured mocks.
    pub struct StubUow {
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        tags: Arc<dyn TagRepository>,
        events: Arc<dyn EventRepository>,
    }

    impl StubUow {
        pub fn new(
            users: MockUserRepository,
            sessions: MockSessionRepository,
            tags: MockTagRepository,
            events: MockEventRepository,
        ) -> Arc<Self> {
            Arc::new(Self {
                users: Arc::new(users),
                sessions: Arc::new(sessions),
                tags: Arc::new(tags),
                events: Arc::new(events),
            })
        }
    }

    impl UnitOfWork for StubUow {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn sessions(&self) -> Arc<dyn SessionRepository> {
            self.sessions.clone()
        }

        fn tags(&self) -> Arc<dyn TagRepository> {
            self.tags.clone()
        }

        fn events(&self) -> Arc<dyn EventRepository> {
            self.events.clone()
        }
    }
}
