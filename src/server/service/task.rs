//! Task and comment service for business logic.
//!
//! Handles defaulting of new tasks, the assignment notifications, the status changes
//! that follow a reassignment and the comment author checks.

use sea_orm::DatabaseConnection;

use crate::{
    model::task::{TaskPriority, TaskStatus},
    server::{
        data::{
            comment::CommentRepository, project::ProjectRepository, task::TaskRepository,
            user::UserRepository,
        },
        error::AppError,
        model::{
            comment::Comment,
            notification::CreateNotificationParams,
            page::{PageRequest, Paginated},
            task::{CreateTaskParams, NewTaskParams, TaskDetails, TaskFilter, UpdateTaskParams},
            user::User,
        },
        service::{notification::NotificationService, notifier::NotificationHub},
        util::parse,
    },
};

pub struct TaskService<'a> {
    db: &'a DatabaseConnection,
    hub: &'a NotificationHub,
}

impl<'a> TaskService<'a> {
    pub fn new(db: &'a DatabaseConnection, hub: &'a NotificationHub) -> Self {
        Self { db, hub }
    }

    /// Creates a task.
    ///
    /// Without an assignee the task is assigned to its creator. An assignee other than
    /// the creator is notified.
    ///
    /// # Returns
    /// - `Ok(TaskDetails)` - The created task
    /// - `Err(AppError::BadRequest)` - Title or creator missing
    /// - `Err(AppError::NotFound)` - Project, assignee or creator does not exist
    pub async fn create(&self, params: NewTaskParams) -> Result<TaskDetails, AppError> {
        let (Some(title), Some(created_by)) = (params.title, params.created_by) else {
            return Err(AppError::bad_request("Title and createdBy are required"));
        };

        if let Some(project) = &params.project {
            if ProjectRepository::new(self.db)
                .find_by_uuid(project)
                .await?
                .is_none()
            {
                return Err(AppError::not_found("Project not found"));
            }
        }

        let users = UserRepository::new(self.db);
        let assigned_to = match params.assigned_to {
            Some(assignee) if assignee != created_by => {
                if users.find_by_uuid(&assignee).await?.is_none() {
                    return Err(AppError::not_found("Assigned user not found"));
                }
                assignee
            }
            _ => created_by.clone(),
        };
        if users.find_by_uuid(&created_by).await?.is_none() {
            return Err(AppError::not_found("Created user not found"));
        }

        let task = TaskRepository::new(self.db)
            .create(CreateTaskParams {
                title,
                description: params.description,
                status: params.status.unwrap_or(TaskStatus::Pending),
                priority: params.priority.unwrap_or(TaskPriority::Medium),
                due_date: params.due_date,
                project: params.project,
                assigned_to,
                created_by,
            })
            .await?;

        if let Some(assignee) = task.assignee_id() {
            if assignee != task.created_by.id {
                self.notify(assignee, format!("You have been assigned to a task ({})", task.title))
                    .await?;
            }
        }

        Ok(task)
    }

    pub async fn get(&self, id: &str) -> Result<TaskDetails, AppError> {
        TaskRepository::new(self.db)
            .find_by_uuid(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))
    }

    /// Lists the tasks of a project, most recently updated first.
    ///
    /// Admins may omit the project to list every task.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Project omitted by a non-admin caller
    /// - `Err(AppError::NotFound)` - Unknown project
    pub async fn list_by_project(
        &self,
        project: Option<String>,
        caller: &User,
        page: PageRequest,
    ) -> Result<Paginated<TaskDetails>, AppError> {
        let project = parse::present(project);

        match &project {
            None if !caller.is_admin() => {
                return Err(AppError::bad_request("Project ID is required"));
            }
            Some(id) => {
                if ProjectRepository::new(self.db).find_by_uuid(id).await?.is_none() {
                    return Err(AppError::not_found("Project not found"));
                }
            }
            None => {}
        }

        let filter = TaskFilter {
            project,
            recently_updated_first: true,
            ..Default::default()
        };

        TaskRepository::new(self.db).get_paginated(&filter, page).await
    }

    /// Lists the tasks assigned to a user.
    ///
    /// # Returns
    /// - `Err(AppError::NotFound)` - Unknown user or no tasks
    pub async fn list_assigned_to(
        &self,
        user: &str,
        page: PageRequest,
    ) -> Result<Paginated<TaskDetails>, AppError> {
        self.ensure_user(user).await?;

        let tasks = TaskRepository::new(self.db)
            .get_paginated(
                &TaskFilter {
                    assigned_to: Some(user.to_string()),
                    ..Default::default()
                },
                page,
            )
            .await?;
        if tasks.is_empty() {
            return Err(AppError::not_found("No tasks found assigned to the user"));
        }

        Ok(tasks)
    }

    /// Lists the tasks created by a user.
    ///
    /// # Returns
    /// - `Err(AppError::NotFound)` - Unknown user or no tasks
    pub async fn list_created_by(
        &self,
        user: &str,
        page: PageRequest,
    ) -> Result<Paginated<TaskDetails>, AppError> {
        self.ensure_user(user).await?;

        let tasks = TaskRepository::new(self.db)
            .get_paginated(
                &TaskFilter {
                    created_by: Some(user.to_string()),
                    ..Default::default()
                },
                page,
            )
            .await?;
        if tasks.is_empty() {
            return Err(AppError::not_found("No tasks found created by the user"));
        }

        Ok(tasks)
    }

    /// Lists the personal tasks of a user: assigned to or created by them and attached
    /// to no project. For an admin user every task is listed.
    ///
    /// # Arguments
    /// - `user` - External id of the user
    /// - `search` - Case-insensitive title substring
    /// - `priority` - Raw priority filter
    /// - `page` - Page request
    pub async fn list_involving(
        &self,
        user: &str,
        search: Option<String>,
        priority: Option<String>,
        page: PageRequest,
    ) -> Result<Paginated<TaskDetails>, AppError> {
        let user = self.ensure_user(user).await?;

        let mut filter = TaskFilter {
            search: parse::present(search),
            priority: parse::variant(priority, "Invalid priority")?,
            ..Default::default()
        };
        if !user.is_admin() {
            filter.involving = Some(user.id);
            filter.without_project = true;
        }

        TaskRepository::new(self.db).get_paginated(&filter, page).await
    }

    /// Applies a partial update and sends the assignment notifications.
    ///
    /// Reassigning to another user notifies both sides and moves the task to
    /// `in-progress`; clearing the assignee notifies the old one and moves the task back
    /// to `pending`. An explicit status in the request wins over both.
    pub async fn update(
        &self,
        id: &str,
        mut params: UpdateTaskParams,
    ) -> Result<TaskDetails, AppError> {
        let before = self.get(id).await?;

        let mut assigned = None;
        let mut unassigned = None;
        let mut status = None;

        match &params.assigned_to {
            Some(Some(assignee)) => {
                if UserRepository::new(self.db).find_by_uuid(assignee).await?.is_none() {
                    return Err(AppError::not_found("Assigned user not found"));
                }
                if before.assignee_id() != Some(assignee.as_str()) {
                    assigned = Some(assignee.clone());
                    unassigned = before.assignee_id().map(str::to_string);
                }
                status = Some(TaskStatus::InProgress);
            }
            Some(None) => {
                if let Some(previous) = before.assignee_id() {
                    unassigned = Some(previous.to_string());
                    status = Some(TaskStatus::Pending);
                }
            }
            None => {}
        }
        if params.status.is_none() {
            params.status = status;
        }

        let task = TaskRepository::new(self.db)
            .update(id, params)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        if let Some(user) = assigned {
            self.notify(&user, format!("You have been assigned to a task ({})", before.title))
                .await?;
        }
        if let Some(user) = unassigned {
            self.notify(
                &user,
                format!("You have been unassigned from a task ({})", before.title),
            )
            .await?;
        }

        Ok(task)
    }

    /// Deletes a task and its comments, returning the deleted task.
    pub async fn delete(&self, id: &str) -> Result<TaskDetails, AppError> {
        let task = self.get(id).await?;

        if !TaskRepository::new(self.db).delete(id).await? {
            return Err(AppError::not_found("Task not found"));
        }

        Ok(task)
    }

    /// Adds a comment written by the caller.
    ///
    /// The task's creator and assignee are notified unless they wrote the comment.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Content or author missing
    /// - `Err(AppError::Forbidden)` - Author is not the caller
    /// - `Err(AppError::NotFound)` - Unknown task
    pub async fn add_comment(
        &self,
        task: &str,
        content: Option<String>,
        author: Option<String>,
        caller: &User,
    ) -> Result<Comment, AppError> {
        let (Some(content), Some(author)) = (parse::present(content), parse::present(author))
        else {
            return Err(AppError::bad_request("Content and author are required"));
        };
        if author != caller.id {
            return Err(AppError::forbidden("You are not allowed to add a comment"));
        }

        let task = self.get(task).await?;
        let comment = CommentRepository::new(self.db)
            .create(&task.id, &author, content)
            .await?;

        let mut recipients = vec![task.created_by.id.as_str()];
        if let Some(assignee) = task.assignee_id() {
            if !recipients.contains(&assignee) {
                recipients.push(assignee);
            }
        }
        for recipient in recipients.into_iter().filter(|user| *user != author) {
            self.notify(
                recipient,
                format!("{} commented on a task ({})", caller.name, task.title),
            )
            .await?;
        }

        Ok(comment)
    }

    /// Lists the comments of a task, newest first.
    pub async fn comments(
        &self,
        task: &str,
        page: PageRequest,
    ) -> Result<Paginated<Comment>, AppError> {
        CommentRepository::new(self.db)
            .get_for_task(task, page)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))
    }

    /// Replaces the text of a comment. Only its author or an admin may do so.
    pub async fn update_comment(
        &self,
        id: &str,
        content: Option<String>,
        caller: &User,
    ) -> Result<Comment, AppError> {
        let comment = self.find_comment(id).await?;
        let content =
            parse::present(content).ok_or_else(|| AppError::bad_request("Content is required"))?;
        if comment.author.id != caller.id && !caller.is_admin() {
            return Err(AppError::forbidden(
                "You are not allowed to update this comment",
            ));
        }

        CommentRepository::new(self.db)
            .update_content(id, content)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    /// Deletes a comment. Only its author or an admin may do so.
    pub async fn delete_comment(&self, id: &str, caller: &User) -> Result<(), AppError> {
        let comment = self.find_comment(id).await?;
        if comment.author.id != caller.id && !caller.is_admin() {
            return Err(AppError::forbidden(
                "You are not allowed to delete this comment",
            ));
        }

        if !CommentRepository::new(self.db).delete(id).await? {
            return Err(AppError::not_found("Comment not found"));
        }

        Ok(())
    }

    async fn find_comment(&self, id: &str) -> Result<Comment, AppError> {
        CommentRepository::new(self.db)
            .find_by_uuid(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    async fn ensure_user(&self, id: &str) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_uuid(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn notify(&self, user: &str, message: String) -> Result<(), AppError> {
        NotificationService::new(self.db, self.hub)
            .notify(CreateNotificationParams::info(user, message))
            .await?;

        Ok(())
    }
}
