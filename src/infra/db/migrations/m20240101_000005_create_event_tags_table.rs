//! Migration: Create event_tags association table.

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_tags_table::Tags;
use super::m20240101_000004_create_events_table::Events;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventTags::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(EventTags::EventId)
                            .col(EventTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_tags_event_id")
                            .from(EventTags::Table, EventTags::EventId)
                            .to(Events::Table, Events::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_tags_tag_id")
                            .from(EventTags::Table, EventTags::TagId)
                            .to(Tags::Table, Tags::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Tag filters join from the tag side
        manager
            .create_index(
                Index::create()
                    .name("idx_event_tags_tag_id")
                    .table(EventTags::Table)
                    .col(EventTags::TagId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventTags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EventTags {
    Table,
    EventId,
    TagId,
}
