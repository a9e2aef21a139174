use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;

use crate::server::{
    data::lookup,
    error::{internal::InternalError, AppError},
    model::{
        comment::Comment,
        page::{PageRequest, Paginated},
    },
};

pub struct CommentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a comment to a task.
    ///
    /// # Arguments
    /// - `task` - External id of the task
    /// - `author` - External id of the author
    /// - `content` - Comment text
    ///
    /// # Returns
    /// - `Ok(Comment)` - The created comment
    /// - `Err(AppError::NotFound)` - Task or author does not exist
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn create(
        &self,
        task: &str,
        author: &str,
        content: String,
    ) -> Result<Comment, AppError> {
        let task_id = lookup::require_task_id(self.db, task).await?;
        let author_id = lookup::require_user_id(self.db, author).await?;
        let now = Utc::now();

        let entity = entity::comment::ActiveModel {
            uuid: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
            content: ActiveValue::Set(content),
            task_id: ActiveValue::Set(task_id),
            author_id: ActiveValue::Set(author_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.load_one(entity).await
    }

    pub async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Comment>, AppError> {
        match self.find_entity(uuid).await? {
            Some(entity) => Ok(Some(self.load_one(entity).await?)),
            None => Ok(None),
        }
    }

    /// Gets a page of a task's comments, newest first.
    ///
    /// # Returns
    /// - `Ok(Some(Paginated<Comment>))` - Comments of the page
    /// - `Ok(None)` - No task with that id
    pub async fn get_for_task(
        &self,
        task: &str,
        page: PageRequest,
    ) -> Result<Option<Paginated<Comment>>, AppError> {
        let Some(task_id) = lookup::task_id(self.db, task).await? else {
            return Ok(None);
        };

        let query =
            entity::prelude::Comment::find().filter(entity::comment::Column::TaskId.eq(task_id));
        let total = query.clone().count(self.db).await?;
        let entities = query
            .order_by_desc(entity::comment::Column::CreatedAt)
            .order_by_desc(entity::comment::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?;

        let author_ids: Vec<i32> = entities.iter().map(|c| c.author_id).collect();
        let authors = lookup::users_by_ids(self.db, author_ids).await?;

        let mut comments = Vec::with_capacity(entities.len());
        for entity in entities {
            let author = authors
                .get(&entity.author_id)
                .ok_or(InternalError::DanglingReference {
                    column: "comment.author_id",
                    id: entity.author_id,
                })?;
            comments.push(Comment::from_entity(entity, task.to_string(), author));
        }

        Ok(Some(Paginated::new(comments, total, page)))
    }

    /// Replaces the text of a comment.
    ///
    /// # Returns
    /// - `Ok(Some(Comment))` - Updated comment
    /// - `Ok(None)` - No comment with that id
    pub async fn update_content(
        &self,
        uuid: &str,
        content: String,
    ) -> Result<Option<Comment>, AppError> {
        let Some(entity) = self.find_entity(uuid).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        active.content = ActiveValue::Set(content);
        active.updated_at = ActiveValue::Set(Utc::now());
        let updated = active.update(self.db).await?;

        Ok(Some(self.load_one(updated).await?))
    }

    /// Deletes a comment.
    ///
    /// # Returns
    /// - `Ok(true)` - Comment deleted
    /// - `Ok(false)` - No comment with that id
    pub async fn delete(&self, uuid: &str) -> Result<bool, AppError> {
        let result = entity::prelude::Comment::delete_many()
            .filter(entity::comment::Column::Uuid.eq(uuid))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn find_entity(&self, uuid: &str) -> Result<Option<entity::comment::Model>, AppError> {
        Ok(entity::prelude::Comment::find()
            .filter(entity::comment::Column::Uuid.eq(uuid))
            .one(self.db)
            .await?)
    }

    async fn load_one(&self, entity: entity::comment::Model) -> Result<Comment, AppError> {
        let task_uuid: Option<String> = entity::prelude::Task::find_by_id(entity.task_id)
            .select_only()
            .column(entity::task::Column::Uuid)
            .into_tuple()
            .one(self.db)
            .await?;
        let task_uuid = task_uuid.ok_or(InternalError::DanglingReference {
            column: "comment.task_id",
            id: entity.task_id,
        })?;

        let mut authors: HashMap<i32, _> = lookup::users_by_ids(self.db, vec![entity.author_id]).await?;
        let author = authors
            .remove(&entity.author_id)
            .ok_or(InternalError::DanglingReference {
                column: "comment.author_id",
                id: entity.author_id,
            })?;

        Ok(Comment::from_entity(entity, task_uuid, &author))
    }
}
