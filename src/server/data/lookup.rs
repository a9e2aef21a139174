//! Translation between external ids and internal keys.
//!
//! Every repository resolves client supplied UUIDs through these helpers and turns the
//! internal keys of loaded rows back into UUIDs or domain models. Nothing outside the
//! data layer sees an internal key.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;

use crate::server::{error::AppError, model::user::User};

/// Resolves a user's external id to its internal key.
pub async fn user_id(db: &DatabaseConnection, uuid: &str) -> Result<Option<i32>, DbErr> {
    entity::prelude::User::find()
        .select_only()
        .column(entity::user::Column::Id)
        .filter(entity::user::Column::Uuid.eq(uuid))
        .into_tuple::<i32>()
        .one(db)
        .await
}

pub async fn project_id(db: &DatabaseConnection, uuid: &str) -> Result<Option<i32>, DbErr> {
    entity::prelude::Project::find()
        .select_only()
        .column(entity::project::Column::Id)
        .filter(entity::project::Column::Uuid.eq(uuid))
        .into_tuple::<i32>()
        .one(db)
        .await
}

pub async fn task_id(db: &DatabaseConnection, uuid: &str) -> Result<Option<i32>, DbErr> {
    entity::prelude::Task::find()
        .select_only()
        .column(entity::task::Column::Id)
        .filter(entity::task::Column::Uuid.eq(uuid))
        .into_tuple::<i32>()
        .one(db)
        .await
}

/// Resolves a user's external id, failing with 404 "User not found".
pub async fn require_user_id(db: &DatabaseConnection, uuid: &str) -> Result<i32, AppError> {
    user_id(db, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Resolves a project's external id, failing with 404 "Project not found".
pub async fn require_project_id(db: &DatabaseConnection, uuid: &str) -> Result<i32, AppError> {
    project_id(db, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))
}

/// Resolves a task's external id, failing with 404 "Task not found".
pub async fn require_task_id(db: &DatabaseConnection, uuid: &str) -> Result<i32, AppError> {
    task_id(db, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))
}

/// Resolves many user external ids at once.
///
/// # Returns
/// - `Ok(HashMap)` - External id to internal key, for the ids that exist
/// - `Err(DbErr)` - Database error during query
pub async fn user_ids(
    db: &DatabaseConnection,
    uuids: &[String],
) -> Result<HashMap<String, i32>, DbErr> {
    if uuids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = entity::prelude::User::find()
        .select_only()
        .column(entity::user::Column::Uuid)
        .column(entity::user::Column::Id)
        .filter(entity::user::Column::Uuid.is_in(uuids.iter().cloned()))
        .into_tuple::<(String, i32)>()
        .all(db)
        .await?;

    Ok(rows.into_iter().collect())
}

/// Loads users by internal key and converts them to domain models.
pub async fn users_by_ids(
    db: &DatabaseConnection,
    mut ids: Vec<i32>,
) -> Result<HashMap<i32, User>, AppError> {
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut users = HashMap::with_capacity(ids.len());
    for entity in entity::prelude::User::find()
        .filter(entity::user::Column::Id.is_in(ids))
        .all(db)
        .await?
    {
        let id = entity.id;
        users.insert(id, User::from_entity(entity)?);
    }

    Ok(users)
}

/// Loads the team member external ids of several projects.
///
/// # Returns
/// - `Ok(HashMap)` - Project key to member external ids, in insertion order. Projects
///   without members are absent.
/// - `Err(DbErr)` - Database error during query
pub async fn member_uuids(
    db: &DatabaseConnection,
    project_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, DbErr> {
    if project_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = entity::prelude::ProjectMember::find()
        .inner_join(entity::prelude::User)
        .select_only()
        .column(entity::project_member::Column::ProjectId)
        .column(entity::user::Column::Uuid)
        .filter(entity::project_member::Column::ProjectId.is_in(project_ids.iter().copied()))
        .order_by_asc(entity::project_member::Column::Id)
        .into_tuple::<(i32, String)>()
        .all(db)
        .await?;

    let mut members: HashMap<i32, Vec<String>> = HashMap::new();
    for (project_id, uuid) in rows {
        members.entry(project_id).or_default().push(uuid);
    }

    Ok(members)
}

/// Loads the user external ids of several internal keys.
pub async fn user_uuids(
    db: &DatabaseConnection,
    ids: Vec<i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = entity::prelude::User::find()
        .select_only()
        .column(entity::user::Column::Id)
        .column(entity::user::Column::Uuid)
        .filter(entity::user::Column::Id.is_in(ids))
        .into_tuple::<(i32, String)>()
        .all(db)
        .await?;

    Ok(rows.into_iter().collect())
}
