//! Comment factory for creating test comment entities.

use crate::factory::helpers::{new_uuid, next_id};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test comments.
pub struct CommentFactory<'a> {
    db: &'a DatabaseConnection,
    task_id: i32,
    author_id: i32,
    content: String,
    created_at: DateTime<Utc>,
}

impl<'a> CommentFactory<'a> {
    /// Creates a new CommentFactory with content `"Comment {id}"`.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `task_id` - Internal id of the commented task
    /// - `author_id` - Internal id of the authoring user
    pub fn new(db: &'a DatabaseConnection, task_id: i32, author_id: i32) -> Self {
        Self {
            db,
            task_id,
            author_id,
            content: format!("Comment {}", next_id()),
            created_at: Utc::now(),
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the comment entity into the database.
    pub async fn build(self) -> Result<entity::comment::Model, DbErr> {
        entity::comment::ActiveModel {
            uuid: ActiveValue::Set(new_uuid()),
            content: ActiveValue::Set(self.content),
            task_id: ActiveValue::Set(self.task_id),
            author_id: ActiveValue::Set(self.author_id),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a comment with default content.
pub async fn create_comment(
    db: &DatabaseConnection,
    task_id: i32,
    author_id: i32,
) -> Result<entity::comment::Model, DbErr> {
    CommentFactory::new(db, task_id, author_id).build().await
}
