use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_create_user_table::User;
use super::m20250301_000002_create_project_table::Project;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Task::Table)
                    .if_not_exists()
                    .col(pk_auto(Task::Id))
                    .col(string_uniq(Task::Uuid))
                    .col(string(Task::Title))
                    .col(text_null(Task::Description))
                    .col(string(Task::Status))
                    .col(string(Task::Priority))
                    .col(timestamp_with_time_zone_null(Task::DueDate))
                    .col(integer_null(Task::ProjectId))
                    .col(integer_null(Task::AssignedToId))
                    .col(integer(Task::CreatedById))
                    .col(timestamp_with_time_zone(Task::CreatedAt))
                    .col(timestamp_with_time_zone(Task::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_project_id")
                            .from(Task::Table, Task::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_assigned_to_id")
                            .from(Task::Table, Task::AssignedToId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_created_by_id")
                            .from(Task::Table, Task::CreatedById)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Task::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Task {
    Table,
    Id,
    Uuid,
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    ProjectId,
    AssignedToId,
    CreatedById,
    CreatedAt,
    UpdatedAt,
}
