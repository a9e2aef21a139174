//! Task domain models and parameters.
//!
//! `TaskDetails` is the single shape every task endpoint returns. The data layer builds
//! it in one place by batch-loading the project, the users and the comment ids a page
//! of tasks refers to.

use chrono::{DateTime, Utc};

use crate::{
    model::task::{CreateTaskDto, TaskDto, TaskPriority, TaskStatus, UpdateTaskDto},
    server::{
        error::AppError,
        model::{project::Project, user::User},
        util::parse,
    },
};

/// Task with every reference resolved to external ids or embedded models.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetails {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub project: Option<Project>,
    pub assigned_to: Option<User>,
    pub created_by: User,
    /// External ids of the task's comments, oldest first.
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskDetails {
    pub fn assignee_id(&self) -> Option<&str> {
        self.assigned_to.as_ref().map(|user| user.id.as_str())
    }

    pub fn into_dto(self) -> TaskDto {
        TaskDto {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            project: self.project.map(Project::into_dto),
            assigned_to: self.assigned_to.map(User::into_dto),
            created_by: self.created_by.into_dto(),
            comments: self.comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Parameters for creating a task. References are external ids.
#[derive(Debug, Clone)]
pub struct CreateTaskParams {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub project: Option<String>,
    pub assigned_to: String,
    pub created_by: String,
}

/// Task creation request after parsing, before existence checks.
///
/// Title and creator stay optional here so the service can report which one is missing.
#[derive(Debug, Clone, Default)]
pub struct NewTaskParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub project: Option<String>,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
}

impl NewTaskParams {
    /// Parses a creation body.
    ///
    /// # Returns
    /// - `Ok(NewTaskParams)` - Parsed request
    /// - `Err(AppError::BadRequest)` - Unknown status or priority, or unreadable due date
    pub fn from_dto(dto: CreateTaskDto) -> Result<Self, AppError> {
        Ok(Self {
            title: parse::present(dto.title),
            description: parse::present(dto.description),
            status: parse::variant(dto.status, "Invalid status")?,
            priority: parse::variant(dto.priority, "Invalid priority")?,
            due_date: parse::present(dto.due_date)
                .map(|date| parse::date(&date))
                .transpose()?,
            project: parse::present(dto.project.map(|project| project.into_id())),
            assigned_to: parse::present(dto.assigned_to.map(|user| user.into_id())),
            created_by: parse::present(dto.created_by),
        })
    }
}

/// Parameters for updating a task.
///
/// The nested options on `assigned_to` and `project` separate "leave alone" (`None`)
/// from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Option<String>>,
    pub project: Option<Option<String>>,
    /// Deletes every comment of the task.
    pub clear_comments: bool,
}

impl UpdateTaskParams {
    /// Parses an update body. Empty scalar fields are ignored; `null` on `assignedTo` or
    /// `project` clears the reference and `comments` set to `null` or `[]` drops them all.
    pub fn from_dto(dto: UpdateTaskDto) -> Result<Self, AppError> {
        let clear_comments = matches!(&dto.comments, Some(None))
            || matches!(&dto.comments, Some(Some(ids)) if ids.is_empty());

        Ok(Self {
            title: parse::present(dto.title),
            description: parse::present(dto.description),
            status: parse::variant(dto.status, "Invalid status")?,
            priority: parse::variant(dto.priority, "Invalid priority")?,
            due_date: parse::present(dto.due_date)
                .map(|date| parse::date(&date))
                .transpose()?,
            assigned_to: dto
                .assigned_to
                .map(|user| parse::present(user.map(|user| user.into_id()))),
            project: dto
                .project
                .map(|project| parse::present(project.map(|project| project.into_id()))),
            clear_comments,
        })
    }
}

/// Selection of tasks for the listing endpoints. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Tasks of this project.
    pub project: Option<String>,
    /// Tasks assigned to this user.
    pub assigned_to: Option<String>,
    /// Tasks created by this user.
    pub created_by: Option<String>,
    /// Tasks assigned to or created by this user.
    pub involving: Option<String>,
    /// Only tasks attached to no project.
    pub without_project: bool,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub priority: Option<TaskPriority>,
    /// Order by last update instead of creation time.
    pub recently_updated_first: bool,
}
