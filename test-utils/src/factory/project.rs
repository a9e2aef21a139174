//! Project factory for creating test project entities and memberships.

use crate::factory::helpers::{new_uuid, next_id};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test projects with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let project = ProjectFactory::new(&db, creator.id)
///     .name("Apollo")
///     .status("completed")
///     .build()
///     .await?;
/// ```
pub struct ProjectFactory<'a> {
    db: &'a DatabaseConnection,
    created_by_id: i32,
    name: String,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl<'a> ProjectFactory<'a> {
    /// Creates a new ProjectFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Project {id}"`
    /// - description: `None`
    /// - status: `"active"`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `created_by_id` - Internal id of the creating user
    pub fn new(db: &'a DatabaseConnection, created_by_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            created_by_id,
            name: format!("Project {}", id),
            description: None,
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status (`"active"`, `"completed"` or `"on-hold"`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the project entity into the database.
    pub async fn build(self) -> Result<entity::project::Model, DbErr> {
        entity::project::ActiveModel {
            uuid: ActiveValue::Set(new_uuid()),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(self.description),
            status: ActiveValue::Set(self.status),
            created_by_id: ActiveValue::Set(self.created_by_id),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a project with default values.
pub async fn create_project(
    db: &DatabaseConnection,
    created_by_id: i32,
) -> Result<entity::project::Model, DbErr> {
    ProjectFactory::new(db, created_by_id).build().await
}

/// Adds a user to a project's team.
///
/// # Arguments
/// - `db` - Database connection
/// - `project_id` - Internal project id
/// - `user_id` - Internal user id
pub async fn add_member(
    db: &DatabaseConnection,
    project_id: i32,
    user_id: i32,
) -> Result<entity::project_member::Model, DbErr> {
    entity::project_member::ActiveModel {
        project_id: ActiveValue::Set(project_id),
        user_id: ActiveValue::Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
}
