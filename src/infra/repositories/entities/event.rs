//! Event database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::Event;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub date: DateTimeUtc,
    pub latitude: f64,
    pub longitude: f64,
    pub fee: f64,
    pub organizer_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OrganizerId",
        to = "super::user::Column::Id"
    )]
    Organizer,
    #[sea_orm(has_many = "super::event_tag::Entity")]
    EventTags,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::event_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventTags.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity; tag names are resolved separately.
    pub fn into_event(self, tags: Vec<String>) -> Event {
        Event {
            id: self.id,
            name: self.name,
            description: self.description,
            date: self.date,
            latitude: self.latitude,
            longitude: self.longitude,
            fee: self.fee,
            organizer_id: self.organizer_id,
            tags,
        }
    }
}

impl From<&Event> for ActiveModel {
    fn from(event: &Event) -> Self {
        ActiveModel {
            id: Set(event.id),
            name: Set(event.name.clone()),
            description: Set(event.description.clone()),
            date: Set(event.date),
            latitude: Set(event.latitude),
            longitude: Set(event.longitude),
            fee: Set(event.fee),
            organizer_id: Set(event.organizer_id),
            created_at: Set(chrono::Utc::now()),
        }
    }
}
