use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{DataDto, ErrorDto, MessageDto, PageDto},
        task::{
            CommentDto, CreateCommentDto, CreateTaskDto, TaskDto, UpdateCommentDto, UpdateTaskDto,
        },
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::AuthGuard,
        model::{
            comment::Comment,
            task::{NewTaskParams, TaskDetails, UpdateTaskParams},
        },
        service::task::TaskService,
        state::AppState,
    },
};

/// Tag for grouping task and comment endpoints in OpenAPI documentation
pub static TASK_TAG: &str = "task";

const TASKS_PAGE_SIZE: u64 = 10;
const COMMENTS_PAGE_SIZE: u64 = 5;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TaskSearchQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Case-insensitive title substring.
    pub search: Option<String>,
    pub priority: Option<String>,
}

/// Create a task. Without an assignee the creator is assigned.
///
/// # Returns
/// - `201 Created` - Task created
/// - `400 Bad Request` - Title or creator missing, or invalid field
/// - `404 Not Found` - Project, assignee or creator not found
#[utoipa::path(
    post,
    path = "/addTask",
    tag = TASK_TAG,
    request_body = CreateTaskDto,
    responses(
        (status = 201, description = "Task created", body = DataDto<TaskDto>),
        (status = 400, description = "Missing or invalid field", body = ErrorDto),
        (status = 404, description = "Referenced record not found", body = ErrorDto)
    ),
)]
pub async fn add_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateTaskDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let params = NewTaskParams::from_dto(payload)?;
    let task = TaskService::new(&state.db, &state.hub).create(params).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataDto::with_message(
            format!("Task ({}) added successfully", task.title),
            task.into_dto(),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/getTask/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task", body = DataDto<TaskDto>),
        (status = 404, description = "Task not found", body = ErrorDto)
    ),
)]
pub async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let task = TaskService::new(&state.db, &state.hub).get(&id).await?;

    Ok((StatusCode::OK, Json(DataDto::new(task.into_dto()))))
}

/// List the tasks of a project, most recently updated first.
///
/// Admins may pass `null` as project id to list every task.
#[utoipa::path(
    get,
    path = "/getTasksByProject/{project_id}",
    tag = TASK_TAG,
    params(
        ("project_id" = String, Path, description = "Project id, or \"null\" for all tasks (admin only)"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Page of tasks", body = PageDto<TaskDto>),
        (status = 400, description = "Project id required", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto)
    ),
)]
pub async fn get_tasks_by_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let tasks = TaskService::new(&state.db, &state.hub)
        .list_by_project(Some(project_id), &caller, query.to_request(TASKS_PAGE_SIZE))
        .await?;

    Ok((
        StatusCode::OK,
        Json(tasks.into_dto(Some("Tasks retrieved successfully"), TaskDetails::into_dto)),
    ))
}

#[utoipa::path(
    get,
    path = "/getTasksAssignedToUser/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "User id"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Page of tasks", body = PageDto<TaskDto>),
        (status = 404, description = "User not found or no tasks", body = ErrorDto)
    ),
)]
pub async fn get_tasks_assigned_to_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let tasks = TaskService::new(&state.db, &state.hub)
        .list_assigned_to(&id, query.to_request(TASKS_PAGE_SIZE))
        .await?;

    Ok((
        StatusCode::OK,
        Json(tasks.into_dto(Some("Tasks retrieved successfully"), TaskDetails::into_dto)),
    ))
}

#[utoipa::path(
    get,
    path = "/getTasksCreatedByUser/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "User id"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Page of tasks", body = PageDto<TaskDto>),
        (status = 404, description = "User not found or no tasks", body = ErrorDto)
    ),
)]
pub async fn get_tasks_created_by_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let tasks = TaskService::new(&state.db, &state.hub)
        .list_created_by(&id, query.to_request(TASKS_PAGE_SIZE))
        .await?;

    Ok((
        StatusCode::OK,
        Json(tasks.into_dto(Some("Tasks retrieved successfully"), TaskDetails::into_dto)),
    ))
}

/// List a user's personal tasks: assigned to or created by them, outside any project.
/// For an admin user every task is listed.
#[utoipa::path(
    get,
    path = "/assignedOrCreatedByUser/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "User id"),
        TaskSearchQuery
    ),
    responses(
        (status = 200, description = "Page of tasks", body = PageDto<TaskDto>),
        (status = 400, description = "Invalid priority", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_tasks_assigned_or_created(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<TaskSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .to_request(TASKS_PAGE_SIZE);
    let tasks = TaskService::new(&state.db, &state.hub)
        .list_involving(&id, query.search, query.priority, page)
        .await?;

    Ok((
        StatusCode::OK,
        Json(tasks.into_dto(Some("Tasks retrieved successfully"), TaskDetails::into_dto)),
    ))
}

/// Update a task.
///
/// `assignedTo` reassigns or, as `null`, unassigns the task and notifies the affected
/// users. `project: null` detaches the task and `comments: null` or `[]` deletes its
/// comments.
#[utoipa::path(
    put,
    path = "/updateTask/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "Task id")
    ),
    request_body = UpdateTaskDto,
    responses(
        (status = 200, description = "Task updated", body = DataDto<TaskDto>),
        (status = 400, description = "Invalid field", body = ErrorDto),
        (status = 404, description = "Task, assignee or project not found", body = ErrorDto)
    ),
)]
pub async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTaskDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let params = UpdateTaskParams::from_dto(payload)?;
    let task = TaskService::new(&state.db, &state.hub)
        .update(&id, params)
        .await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            format!("Task ({}) updated successfully", task.title),
            task.into_dto(),
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/deleteTask/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task deleted", body = MessageDto),
        (status = 404, description = "Task not found", body = ErrorDto)
    ),
)]
pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let task = TaskService::new(&state.db, &state.hub).delete(&id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(format!(
            "Task ({}) deleted successfully",
            task.title
        ))),
    ))
}

/// Comment on a task as the logged in user.
#[utoipa::path(
    post,
    path = "/addCommentToTask/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "Task id")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment added", body = DataDto<CommentDto>),
        (status = 400, description = "Content or author missing", body = ErrorDto),
        (status = 403, description = "Author is not the caller", body = ErrorDto),
        (status = 404, description = "Task not found", body = ErrorDto)
    ),
)]
pub async fn add_comment_to_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<CreateCommentDto>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let comment = TaskService::new(&state.db, &state.hub)
        .add_comment(&id, payload.content, payload.author, &caller)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataDto::with_message(
            "Comment added successfully",
            comment.into_dto(),
        )),
    ))
}

/// List the comments of a task, newest first.
#[utoipa::path(
    get,
    path = "/getCommentsForTask/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "Task id"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Page of comments", body = PageDto<CommentDto>),
        (status = 404, description = "Task not found", body = ErrorDto)
    ),
)]
pub async fn get_comments_for_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let comments = TaskService::new(&state.db, &state.hub)
        .comments(&id, query.to_request(COMMENTS_PAGE_SIZE))
        .await?;

    Ok((
        StatusCode::OK,
        Json(comments.into_dto(Some("Comments retrieved successfully"), Comment::into_dto)),
    ))
}

/// Edit a comment. Only its author or an admin may do so.
#[utoipa::path(
    put,
    path = "/updateComment/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "Comment id")
    ),
    request_body = UpdateCommentDto,
    responses(
        (status = 200, description = "Comment updated", body = DataDto<CommentDto>),
        (status = 400, description = "Content missing", body = ErrorDto),
        (status = 403, description = "Not the author", body = ErrorDto),
        (status = 404, description = "Comment not found", body = ErrorDto)
    ),
)]
pub async fn update_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCommentDto>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let comment = TaskService::new(&state.db, &state.hub)
        .update_comment(&id, payload.content, &caller)
        .await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            "Comment updated successfully",
            comment.into_dto(),
        )),
    ))
}

/// Delete a comment. Only its author or an admin may do so.
#[utoipa::path(
    delete,
    path = "/deleteComment/{id}",
    tag = TASK_TAG,
    params(
        ("id" = String, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = MessageDto),
        (status = 403, description = "Not the author", body = ErrorDto),
        (status = 404, description = "Comment not found", body = ErrorDto)
    ),
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    TaskService::new(&state.db, &state.hub)
        .delete_comment(&id, &caller)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Comment deleted successfully")),
    ))
}
