//! Migration: Create attendance table.
//!
//! The composite primary key is what rejects a second registration of
//! the same user for the same event.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000004_create_events_table::Events;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attendance::UserId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::EventId).uuid().not_null())
                    .col(
                        ColumnDef::new(Attendance::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Attendance::UserId)
                            .col(Attendance::EventId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_user_id")
                            .from(Attendance::Table, Attendance::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_event_id")
                            .from(Attendance::Table, Attendance::EventId)
                            .to(Events::Table, Events::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_event_id")
                    .table(Attendance::Table)
                    .col(Attendance::EventId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attendance {
    Table,
    UserId,
    EventId,
    RegisteredAt,
}
