use chrono::{DateTime, Utc};

use crate::{
    model::task::{CommentAuthorDto, CommentDto},
    server::model::user::User,
};

/// Comment with its task as external id and its author expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub content: String,
    /// External id of the task.
    pub task: String,
    pub author: CommentAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentAuthor {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Comment {
    /// Builds a comment from its row and the already loaded task id and author.
    pub fn from_entity(entity: entity::comment::Model, task_uuid: String, author: &User) -> Self {
        Self {
            id: entity.uuid,
            content: entity.content,
            task: task_uuid,
            author: CommentAuthor {
                id: author.id.clone(),
                name: author.name.clone(),
                email: author.email.clone(),
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn into_dto(self) -> CommentDto {
        CommentDto {
            id: self.id,
            content: self.content,
            task: self.task,
            author: CommentAuthorDto {
                id: self.author.id,
                name: self.author.name,
                email: self.author.email,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
