//! Task data repository.
//!
//! Every read goes through `load_details`, which turns a batch of task rows into
//! `TaskDetails` with one query per referenced table instead of one per task.

use chrono::Utc;
use sea_orm::{
    sea_query::LikeExpr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;

use crate::server::{
    data::{lookup, project::ProjectRepository},
    error::{internal::InternalError, AppError},
    model::{
        page::{PageRequest, Paginated},
        project::Project,
        task::{CreateTaskParams, TaskDetails, TaskFilter, UpdateTaskParams},
    },
    util::parse,
};

pub struct TaskRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TaskRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a task.
    ///
    /// # Arguments
    /// - `params` - Task fields with project and users as external ids
    ///
    /// # Returns
    /// - `Ok(TaskDetails)` - The created task
    /// - `Err(AppError::NotFound)` - A referenced project or user does not exist
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn create(&self, params: CreateTaskParams) -> Result<TaskDetails, AppError> {
        let created_by_id = lookup::require_user_id(self.db, &params.created_by).await?;
        let assigned_to_id = lookup::require_user_id(self.db, &params.assigned_to).await?;
        let project_id = match &params.project {
            Some(uuid) => Some(lookup::require_project_id(self.db, uuid).await?),
            None => None,
        };
        let now = Utc::now();

        let entity = entity::task::ActiveModel {
            uuid: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            status: ActiveValue::Set(params.status.to_string()),
            priority: ActiveValue::Set(params.priority.to_string()),
            due_date: ActiveValue::Set(params.due_date),
            project_id: ActiveValue::Set(project_id),
            assigned_to_id: ActiveValue::Set(Some(assigned_to_id)),
            created_by_id: ActiveValue::Set(created_by_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.load_one(entity).await
    }

    /// Finds a task by external id.
    pub async fn find_by_uuid(&self, uuid: &str) -> Result<Option<TaskDetails>, AppError> {
        match self.find_entity(uuid).await? {
            Some(entity) => Ok(Some(self.load_one(entity).await?)),
            None => Ok(None),
        }
    }

    /// Gets a page of tasks matching a filter.
    ///
    /// Filters naming an unknown project or user match nothing.
    ///
    /// # Arguments
    /// - `filter` - Selection and ordering
    /// - `page` - Requested page
    ///
    /// # Returns
    /// - `Ok(Paginated<TaskDetails>)` - Tasks of the page and the total match count
    /// - `Err(AppError)` - Database error or invalid stored data
    pub async fn get_paginated(
        &self,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> Result<Paginated<TaskDetails>, AppError> {
        let Some(condition) = self.condition(filter).await? else {
            return Ok(Paginated::new(Vec::new(), 0, page));
        };

        let query = entity::prelude::Task::find().filter(condition);
        let total = query.clone().count(self.db).await?;

        let order = if filter.recently_updated_first {
            entity::task::Column::UpdatedAt
        } else {
            entity::task::Column::CreatedAt
        };
        let entities = query
            .order_by_desc(order)
            .order_by_desc(entity::task::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?;

        let tasks = self.load_details(entities).await?;

        Ok(Paginated::new(tasks, total, page))
    }

    /// Applies a partial update.
    ///
    /// # Returns
    /// - `Ok(Some(TaskDetails))` - Updated task
    /// - `Ok(None)` - No task with that id
    /// - `Err(AppError::NotFound)` - New assignee or project does not exist
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn update(
        &self,
        uuid: &str,
        params: UpdateTaskParams,
    ) -> Result<Option<TaskDetails>, AppError> {
        let Some(entity) = self.find_entity(uuid).await? else {
            return Ok(None);
        };
        let task_id = entity.id;

        let assigned_to_id = match &params.assigned_to {
            Some(Some(user)) => Some(Some(lookup::require_user_id(self.db, user).await?)),
            Some(None) => Some(None),
            None => None,
        };
        let project_id = match &params.project {
            Some(Some(project)) => Some(Some(lookup::require_project_id(self.db, project).await?)),
            Some(None) => Some(None),
            None => None,
        };

        if params.clear_comments {
            entity::prelude::Comment::delete_many()
                .filter(entity::comment::Column::TaskId.eq(task_id))
                .exec(self.db)
                .await?;
        }

        let mut active = entity.into_active_model();
        if let Some(title) = params.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(status) = params.status {
            active.status = ActiveValue::Set(status.to_string());
        }
        if let Some(priority) = params.priority {
            active.priority = ActiveValue::Set(priority.to_string());
        }
        if let Some(due_date) = params.due_date {
            active.due_date = ActiveValue::Set(Some(due_date));
        }
        if let Some(assigned_to_id) = assigned_to_id {
            active.assigned_to_id = ActiveValue::Set(assigned_to_id);
        }
        if let Some(project_id) = project_id {
            active.project_id = ActiveValue::Set(project_id);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(self.db).await?;

        Ok(Some(self.load_one(updated).await?))
    }

    /// Deletes a task and its comments.
    ///
    /// # Returns
    /// - `Ok(true)` - Task deleted
    /// - `Ok(false)` - No task with that id
    pub async fn delete(&self, uuid: &str) -> Result<bool, AppError> {
        let Some(task_id) = lookup::task_id(self.db, uuid).await? else {
            return Ok(false);
        };

        entity::prelude::Comment::delete_many()
            .filter(entity::comment::Column::TaskId.eq(task_id))
            .exec(self.db)
            .await?;
        entity::prelude::Task::delete_by_id(task_id)
            .exec(self.db)
            .await?;

        Ok(true)
    }

    /// Builds `TaskDetails` for a batch of rows.
    ///
    /// Projects, users and comment ids are each loaded with a single query for the whole
    /// batch. The output keeps the input order.
    pub async fn load_details(
        &self,
        entities: Vec<entity::task::Model>,
    ) -> Result<Vec<TaskDetails>, AppError> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids: Vec<i32> = entities.iter().map(|t| t.id).collect();

        let project_ids: Vec<i32> = entities.iter().filter_map(|t| t.project_id).collect();
        let project_rows = if project_ids.is_empty() {
            Vec::new()
        } else {
            entity::prelude::Project::find()
                .filter(entity::project::Column::Id.is_in(project_ids))
                .all(self.db)
                .await?
        };
        let row_ids: Vec<i32> = project_rows.iter().map(|p| p.id).collect();
        let projects: HashMap<i32, Project> = row_ids
            .into_iter()
            .zip(ProjectRepository::new(self.db).load(project_rows).await?)
            .collect();

        let user_ids: Vec<i32> = entities
            .iter()
            .flat_map(|t| [Some(t.created_by_id), t.assigned_to_id])
            .flatten()
            .collect();
        let users = lookup::users_by_ids(self.db, user_ids).await?;

        let comment_rows: Vec<(i32, String)> = entity::prelude::Comment::find()
            .select_only()
            .column(entity::comment::Column::TaskId)
            .column(entity::comment::Column::Uuid)
            .filter(entity::comment::Column::TaskId.is_in(task_ids))
            .order_by_asc(entity::comment::Column::CreatedAt)
            .order_by_asc(entity::comment::Column::Id)
            .into_tuple()
            .all(self.db)
            .await?;
        let mut comments: HashMap<i32, Vec<String>> = HashMap::new();
        for (task_id, uuid) in comment_rows {
            comments.entry(task_id).or_default().push(uuid);
        }

        let mut details = Vec::with_capacity(entities.len());
        for entity in entities {
            let created_by = users.get(&entity.created_by_id).cloned().ok_or(
                InternalError::DanglingReference {
                    column: "task.created_by_id",
                    id: entity.created_by_id,
                },
            )?;

            details.push(TaskDetails {
                status: parse::stored("task.status", &entity.status)?,
                priority: parse::stored("task.priority", &entity.priority)?,
                project: entity.project_id.and_then(|id| projects.get(&id).cloned()),
                assigned_to: entity.assigned_to_id.and_then(|id| users.get(&id).cloned()),
                comments: comments.remove(&entity.id).unwrap_or_default(),
                created_by,
                id: entity.uuid,
                title: entity.title,
                description: entity.description,
                due_date: entity.due_date,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            });
        }

        Ok(details)
    }

    async fn load_one(&self, entity: entity::task::Model) -> Result<TaskDetails, AppError> {
        let id = entity.id;

        self.load_details(vec![entity])
            .await?
            .pop()
            .ok_or_else(|| InternalError::DanglingReference { column: "task.id", id }.into())
    }

    async fn find_entity(&self, uuid: &str) -> Result<Option<entity::task::Model>, AppError> {
        Ok(entity::prelude::Task::find()
            .filter(entity::task::Column::Uuid.eq(uuid))
            .one(self.db)
            .await?)
    }

    /// Translates a filter into a query condition.
    ///
    /// Returns `None` when the filter names a project or user that does not exist.
    async fn condition(&self, filter: &TaskFilter) -> Result<Option<Condition>, AppError> {
        let mut condition = Condition::all();

        if let Some(project) = &filter.project {
            let Some(project_id) = lookup::project_id(self.db, project).await? else {
                return Ok(None);
            };
            condition = condition.add(entity::task::Column::ProjectId.eq(project_id));
        }
        if let Some(user) = &filter.assigned_to {
            let Some(user_id) = lookup::user_id(self.db, user).await? else {
                return Ok(None);
            };
            condition = condition.add(entity::task::Column::AssignedToId.eq(user_id));
        }
        if let Some(user) = &filter.created_by {
            let Some(user_id) = lookup::user_id(self.db, user).await? else {
                return Ok(None);
            };
            condition = condition.add(entity::task::Column::CreatedById.eq(user_id));
        }
        if let Some(user) = &filter.involving {
            let Some(user_id) = lookup::user_id(self.db, user).await? else {
                return Ok(None);
            };
            condition = condition.add(
                Condition::any()
                    .add(entity::task::Column::AssignedToId.eq(user_id))
                    .add(entity::task::Column::CreatedById.eq(user_id)),
            );
        }
        if filter.without_project {
            condition = condition.add(entity::task::Column::ProjectId.is_null());
        }
        if let Some(search) = &filter.search {
            condition = condition.add(
                entity::task::Column::Title
                    .like(LikeExpr::new(parse::like_contains(search)).escape('\\')),
            );
        }
        if let Some(priority) = filter.priority {
            condition = condition.add(entity::task::Column::Priority.eq(priority.as_ref()));
        }

        Ok(Some(condition))
    }
}
