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
                    .table(ProjectMember::Table)
                    .if_not_exists()
                    .col(pk_auto(ProjectMember::Id))
                    .col(integer(ProjectMember::ProjectId))
                    .col(integer(ProjectMember::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_member_project_id")
                            .from(ProjectMember::Table, ProjectMember::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_member_user_id")
                            .from(ProjectMember::Table, ProjectMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .index(
                        Index::create()
                            .unique()
                            .name("idx_project_member_unique")
                            .col(ProjectMember::ProjectId)
                            .col(ProjectMember::UserId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProjectMember {
    Table,
    Id,
    ProjectId,
    UserId,
}
