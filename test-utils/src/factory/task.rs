//! Task factory for creating test task entities.

use crate::factory::helpers::{new_uuid, next_id};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test tasks with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let task = TaskFactory::new(&db, creator.id)
///     .project(project.id)
///     .assigned_to(member.id)
///     .status("completed")
///     .build()
///     .await?;
/// ```
pub struct TaskFactory<'a> {
    db: &'a DatabaseConnection,
    created_by_id: i32,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    due_date: Option<DateTime<Utc>>,
    project_id: Option<i32>,
    assigned_to_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'a> TaskFactory<'a> {
    /// Creates a new TaskFactory with default values.
    ///
    /// Defaults:
    /// - title: `"Task {id}"`
    /// - status: `"pending"`
    /// - priority: `"medium"`
    /// - no project, no assignee
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `created_by_id` - Internal id of the creating user
    pub fn new(db: &'a DatabaseConnection, created_by_id: i32) -> Self {
        let id = next_id();
        let now = Utc::now();
        Self {
            db,
            created_by_id,
            title: format!("Task {}", id),
            description: None,
            status: "pending".to_string(),
            priority: "medium".to_string(),
            due_date: None,
            project_id: None,
            assigned_to_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status (`"pending"`, `"in-progress"` or `"completed"`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the priority (`"low"`, `"medium"`, `"high"` or `"urgent"`).
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn project(mut self, project_id: i32) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn assigned_to(mut self, user_id: i32) -> Self {
        self.assigned_to_id = Some(user_id);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Builds and inserts the task entity into the database.
    pub async fn build(self) -> Result<entity::task::Model, DbErr> {
        entity::task::ActiveModel {
            uuid: ActiveValue::Set(new_uuid()),
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(self.description),
            status: ActiveValue::Set(self.status),
            priority: ActiveValue::Set(self.priority),
            due_date: ActiveValue::Set(self.due_date),
            project_id: ActiveValue::Set(self.project_id),
            assigned_to_id: ActiveValue::Set(self.assigned_to_id),
            created_by_id: ActiveValue::Set(self.created_by_id),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.updated_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a task without project or assignee.
pub async fn create_task(
    db: &DatabaseConnection,
    created_by_id: i32,
) -> Result<entity::task::Model, DbErr> {
    TaskFactory::new(db, created_by_id).build().await
}
