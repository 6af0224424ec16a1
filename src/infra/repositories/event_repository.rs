//! Event catalog: events, their tag links and attendance.
//!
//! Holds the filter engine. Every listing is ordered by date, then id, so
//! offset pagination stays stable.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use super::bounded;
use super::entities::{
    attendance, event, event_tag, tag, AttendanceEntity, EventEntity, EventTagEntity, TagEntity,
};
use crate::domain::{normalize_tag_names, Event, EventFilter};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::in_transaction;
use crate::types::Pagination;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Upper bound on ids per `IN (...)` list when loading tag names.
const TAG_LOOKUP_CHUNK: usize = 500;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert the event and link its tags atomically.
    ///
    /// Fails with `NotFound` for an unknown organizer or tag name; nothing is written then.
    async fn save(&self, event: &Event) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>>;

    async fn find_all(&self) -> AppResult<Vec<Event>>;

    /// Events matching every predicate set on `filter`.
    async fn find_all_with_filters(&self, filter: &EventFilter) -> AppResult<Vec<Event>>;

    /// Events carrying any of `names`. No names means no events.
    async fn find_all_by_tags(&self, names: &[String]) -> AppResult<Vec<Event>>;

    async fn find_by_organizer(
        &self,
        organizer_id: Uuid,
        pagination: Option<Pagination>,
    ) -> AppResult<Vec<Event>>;

    async fn find_attending_events(
        &self,
        user_id: Uuid,
        pagination: Option<Pagination>,
    ) -> AppResult<Vec<Event>>;

    /// A second registration for the same pair fails with `Conflict`.
    async fn register_attendance(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()>;

    /// Idempotent.
    async fn remove_attendance(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()>;

    /// Attendee ids in registration order.
    async fn get_attendees(&self, event_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Remove the event with its tag links and attendance in one transaction.
    async fn delete(&self, event_id: Uuid) -> AppResult<()>;
}

pub struct EventStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl EventStore {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    /// Execute an event query and resolve tag names for the page it returns.
    async fn load(&self, query: Select<EventEntity>) -> AppResult<Vec<Event>> {
        let models = query.all(&self.db).await?;
        attach_tags(&self.db, models).await
    }
}

fn ordered(query: Select<EventEntity>, pagination: Option<Pagination>) -> Select<EventEntity> {
    let query = query
        .order_by_asc(event::Column::Date)
        .order_by_asc(event::Column::Id);

    match pagination {
        Some(page) => query.offset(page.offset()).limit(page.limit()),
        None => query,
    }
}

/// Compose the filter into one query. Absent fields add no predicate.
fn filtered_query(filter: &EventFilter) -> Select<EventEntity> {
    let mut condition = Condition::all();
    if let Some(from) = filter.date_from {
        condition = condition.add(event::Column::Date.gte(from));
    }
    if let Some(to) = filter.date_to {
        condition = condition.add(event::Column::Date.lte(to));
    }
    if let Some(min) = filter.min_fee {
        condition = condition.add(event::Column::Fee.gte(min));
    }
    if let Some(max) = filter.max_fee {
        condition = condition.add(event::Column::Fee.lte(max));
    }

    let mut query = EventEntity::find();
    let tags = normalize_tag_names(&filter.tags);
    if !tags.is_empty() {
        // Any-of match; DISTINCT folds events reached through several tags
        query = query
            .join(JoinType::InnerJoin, event::Relation::EventTags.def())
            .join(JoinType::InnerJoin, event_tag::Relation::Tag.def())
            .distinct();
        condition = condition.add(tag::Column::Name.is_in(tags));
    }

    ordered(query.filter(condition), filter.pagination)
}

/// Resolve tag names for a batch of events, sorted per event.
async fn attach_tags<C>(db: &C, models: Vec<event::Model>) -> AppResult<Vec<Event>>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut names: HashMap<Uuid, Vec<String>> = HashMap::new();

    for chunk in ids.chunks(TAG_LOOKUP_CHUNK) {
        let links = EventTagEntity::find()
            .filter(event_tag::Column::EventId.is_in(chunk.to_vec()))
            .find_also_related(TagEntity)
            .all(db)
            .await?;

        for (link, tag) in links {
            if let Some(tag) = tag {
                names.entry(link.event_id).or_default().push(tag.name);
            }
        }
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let mut tags = names.remove(&model.id).unwrap_or_default();
            tags.sort();
            model.into_event(tags)
        })
        .collect())
}

#[async_trait]
impl EventRepository for EventStore {
    async fn save(&self, event: &Event) -> AppResult<()> {
        let record = event.clone();

        bounded(
            self.timeout,
            in_transaction(&self.db, move |txn| {
                Box::pin(async move {
                    EventEntity::insert(event::ActiveModel::from(&record))
                        .exec_without_returning(txn)
                        .await
                        .map_err(|e| AppError::from_db(e, "Event", "Organizer"))?;

                    for name in normalize_tag_names(&record.tags) {
                        let tag = TagEntity::find()
                            .filter(tag::Column::Name.eq(name.as_str()))
                            .one(txn)
                            .await?
                            .ok_or_else(|| AppError::not_found(format!("Tag '{}'", name)))?;

                        let link = event_tag::ActiveModel {
                            event_id: Set(record.id),
                            tag_id: Set(tag.id),
                        };
                        EventTagEntity::insert(link).exec_without_returning(txn).await?;
                    }

                    tracing::debug!(
                        event_id = %record.id,
                        organizer_id = %record.organizer_id,
                        tags = record.tags.len(),
                        "Event saved"
                    );
                    Ok(())
                })
            }),
        )
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        bounded(self.timeout, async {
            let mut found = self.load(EventEntity::find_by_id(id)).await?;
            Ok(found.pop())
        })
        .await
    }

    async fn find_all(&self) -> AppResult<Vec<Event>> {
        bounded(self.timeout, self.load(ordered(EventEntity::find(), None))).await
    }

    async fn find_all_with_filters(&self, filter: &EventFilter) -> AppResult<Vec<Event>> {
        bounded(self.timeout, self.load(filtered_query(filter))).await
    }

    async fn find_all_by_tags(&self, names: &[String]) -> AppResult<Vec<Event>> {
        let filter = EventFilter::by_tags(names);
        if filter.tags.is_empty() {
            return Ok(Vec::new());
        }

        bounded(self.timeout, self.load(filtered_query(&filter))).await
    }

    async fn find_by_organizer(
        &self,
        organizer_id: Uuid,
        pagination: Option<Pagination>,
    ) -> AppResult<Vec<Event>> {
        let query = EventEntity::find().filter(event::Column::OrganizerId.eq(organizer_id));
        bounded(self.timeout, self.load(ordered(query, pagination))).await
    }

    async fn find_attending_events(
        &self,
        user_id: Uuid,
        pagination: Option<Pagination>,
    ) -> AppResult<Vec<Event>> {
        let query = EventEntity::find()
            .join(JoinType::InnerJoin, event::Relation::Attendance.def())
            .filter(attendance::Column::UserId.eq(user_id));
        bounded(self.timeout, self.load(ordered(query, pagination))).await
    }

    async fn register_attendance(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()> {
        bounded(self.timeout, async {
            let row = attendance::ActiveModel {
                user_id: Set(user_id),
                event_id: Set(event_id),
                registered_at: Set(chrono::Utc::now()),
            };
            AttendanceEntity::insert(row)
                .exec_without_returning(&self.db)
                .await
                .map_err(|e| AppError::from_db(e, "Registration", "Event"))?;

            tracing::debug!(user_id = %user_id, event_id = %event_id, "Attendance registered");
            Ok(())
        })
        .await
    }

    async fn remove_attendance(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()> {
        bounded(self.timeout, async {
            let result = AttendanceEntity::delete_many()
                .filter(attendance::Column::UserId.eq(user_id))
                .filter(attendance::Column::EventId.eq(event_id))
                .exec(&self.db)
                .await?;

            tracing::debug!(
                user_id = %user_id,
                event_id = %event_id,
                removed = result.rows_affected,
                "Attendance removed"
            );
            Ok(())
        })
        .await
    }

    async fn get_attendees(&self, event_id: Uuid) -> AppResult<Vec<Uuid>> {
        bounded(self.timeout, async {
            let rows = AttendanceEntity::find()
                .filter(attendance::Column::EventId.eq(event_id))
                .order_by_asc(attendance::Column::RegisteredAt)
                .order_by_asc(attendance::Column::UserId)
                .all(&self.db)
                .await?;
            Ok(rows.into_iter().map(|row| row.user_id).collect())
        })
        .await
    }

    async fn delete(&self, event_id: Uuid) -> AppResult<()> {
        bounded(
            self.timeout,
            in_transaction(&self.db, move |txn| {
                Box::pin(async move {
                    EventTagEntity::delete_many()
                        .filter(event_tag::Column::EventId.eq(event_id))
                        .exec(txn)
                        .await?;

                    AttendanceEntity::delete_many()
                        .filter(attendance::Column::EventId.eq(event_id))
                        .exec(txn)
                        .await?;

                    let removed = EventEntity::delete_by_id(event_id).exec(txn).await?;
                    if removed.rows_affected == 0 {
                        return Err(AppError::not_found("Event"));
                    }

                    tracing::debug!(event_id = %event_id, "Event deleted");
                    Ok(())
                })
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_unfiltered_query_has_no_predicates() {
        let sql = filtered_query(&EventFilter::default())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("DISTINCT"));
        assert!(sql.contains(r#"ORDER BY "events"."date" ASC, "events"."id" ASC"#));
    }

    #[test]
    fn test_tag_filter_joins_and_deduplicates() {
        let sql = filtered_query(&EventFilter::by_tags(["Music", "Tech"]))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.starts_with("SELECT DISTINCT"));
        assert!(sql.contains(r#"INNER JOIN "event_tags""#));
        assert!(sql.contains(r#"INNER JOIN "tags""#));
        assert!(sql.contains(r#""tags"."name" IN ('Music', 'Tech')"#));
    }

    #[test]
    fn test_bounds_and_pagination() {
        let filter = EventFilter {
            min_fee: Some(5.0),
            max_fee: Some(50.0),
            pagination: Some(Pagination::new(3, 10).unwrap()),
            ..EventFilter::default()
        };
        let sql = filtered_query(&filter).build(DbBackend::Postgres).to_string();

        assert!(sql.contains(r#""events"."fee" >="#));
        assert!(sql.contains(r#""events"."fee" <="#));
        assert!(!sql.contains("DISTINCT"));
        assert!(sql.contains("LIMIT 10"));
        assert!(sql.contains("OFFSET 20"));
    }
}
