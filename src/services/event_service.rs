//! Event service - catalog queries, attendance and organizer-only deletion.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{normalize_tag_names, Event, EventFilter, NewEvent, Tag};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::Pagination;

/// Event service trait for dependency injection.
#[async_trait]
pub trait EventService: Send + Sync {
    /// Validate the input and persist it under `organizer_id`.
    async fn create_event(&self, organizer_id: Uuid, input: NewEvent) -> AppResult<Event>;

    async fn get_event(&self, id: Uuid) -> AppResult<Event>;

    async fn list_events(&self) -> AppResult<Vec<Event>>;

    async fn get_events_with_filters(&self, filter: EventFilter) -> AppResult<Vec<Event>>;

    async fn get_events_by_tags(&self, names: Vec<String>) -> AppResult<Vec<Event>>;

    async fn get_hosting_events(
        &self,
        user_id: Uuid,
        pagination: Option<Pagination>,
    ) -> AppResult<Vec<Event>>;

    async fn get_attending_events(
        &self,
        user_id: Uuid,
        pagination: Option<Pagination>,
    ) -> AppResult<Vec<Event>>;

    async fn register_attendance(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()>;

    async fn remove_attendance(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()>;

    async fn get_attendees(&self, event_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Delete an event on behalf of `user_id`, who must be its organizer.
    async fn delete_event(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()>;

    async fn list_tags(&self) -> AppResult<Vec<Tag>>;
}

pub struct EventManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EventManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> EventService for EventManager<U> {
    async fn create_event(&self, organizer_id: Uuid, input: NewEvent) -> AppResult<Event> {
        let event = input.into_event(organizer_id)?;
        self.uow.events().save(&event).await?;

        tracing::info!(event_id = %event.id, organizer_id = %organizer_id, "Event created");
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> AppResult<Event> {
        self.uow.events().find_by_id(id).await?.ok_or_not_found("Event")
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        self.uow.events().find_all().await
    }

    async fn get_events_with_filters(&self, filter: EventFilter) -> AppResult<Vec<Event>> {
        self.uow.events().find_all_with_filters(&filter).await
    }

    async fn get_events_by_tags(&self, names: Vec<String>) -> AppResult<Vec<Event>> {
        let names = normalize_tag_names(names);
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.uow.events().find_all_by_tags(&names).await
    }

    async fn get_hosting_events(
        &self,
        user_id: Uuid,
        pagination: Option<Pagination>,
    ) -> AppResult<Vec<Event>> {
        self.uow.events().find_by_organizer(user_id, pagination).await
    }

    async fn get_attending_events(
        &self,
        user_id: Uuid,
        pagination: Option<Pagination>,
    ) -> AppResult<Vec<Event>> {
        self.uow.events().find_attending_events(user_id, pagination).await
    }

    async fn register_attendance(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()> {
        self.uow.events().register_attendance(user_id, event_id).await
    }

    async fn remove_attendance(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()> {
        self.uow.events().remove_attendance(user_id, event_id).await
    }

    async fn get_attendees(&self, event_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.uow.events().get_attendees(event_id).await
    }

    async fn delete_event(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()> {
        let event = self.get_event(event_id).await?;

        if event.organizer_id != user_id {
            tracing::warn!(user_id = %user_id, event_id = %event_id, "Delete refused: not the organizer");
            return Err(AppError::Forbidden);
        }

        self.uow.events().delete(event_id).await?;
        tracing::info!(event_id = %event_id, "Event deleted");
        Ok(())
    }

    async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        self.uow.tags().find_all().await
    }
}
