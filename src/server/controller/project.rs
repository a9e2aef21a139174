use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{DataDto, ErrorDto, MessageDto, PageDto},
        project::{
            AssignTeamMembersDto, CreateProjectDto, ProjectDto, ProjectOverviewDto,
            UpdateProjectDto,
        },
        user::{MemberStatsDto, UserDto},
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            project::{ProjectOverview, UpdateProjectParams},
            user::{MemberStats, User},
        },
        service::project::ProjectService,
        state::AppState,
    },
};

/// Tag for grouping project endpoints in OpenAPI documentation
pub static PROJECT_TAG: &str = "project";

const PROJECTS_PAGE_SIZE: u64 = 6;

/// Create a project.
///
/// Members other than the creator are notified.
///
/// # Returns
/// - `201 Created` - Project created
/// - `400 Bad Request` - Name or creator missing
/// - `404 Not Found` - Creator or a member does not exist
#[utoipa::path(
    post,
    path = "/addProject",
    tag = PROJECT_TAG,
    request_body = CreateProjectDto,
    responses(
        (status = 201, description = "Project created", body = DataDto<ProjectDto>),
        (status = 400, description = "Name or creator missing", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Creator or member not found", body = ErrorDto)
    ),
)]
pub async fn add_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateProjectDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let team_members = payload
        .team_members
        .into_iter()
        .map(|member| member.into_id())
        .collect();

    let project = ProjectService::new(&state.db, &state.hub)
        .create(
            payload.name,
            payload.description,
            payload.created_by,
            team_members,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataDto::with_message(
            format!("Project ({}) added successfully", project.name),
            project.into_dto(),
        )),
    ))
}

/// Replace a project's team, given as usernames.
///
/// # Access Control
/// - `Manager` - Managers and admins
#[utoipa::path(
    put,
    path = "/assignTeamMembers/{id}",
    tag = PROJECT_TAG,
    params(
        ("id" = String, Path, description = "Project id")
    ),
    request_body = AssignTeamMembersDto,
    responses(
        (status = 200, description = "Team assigned", body = DataDto<ProjectDto>),
        (status = 400, description = "Creator missing from the new team", body = ErrorDto),
        (status = 403, description = "Not a manager", body = ErrorDto),
        (status = 404, description = "Project or username not found", body = ErrorDto)
    ),
)]
pub async fn assign_team_members(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<AssignTeamMembersDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Manager])
        .await?;

    let project = ProjectService::new(&state.db, &state.hub)
        .assign_members(&id, payload.team_members)
        .await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            format!(
                "Team members assigned to project ({}) successfully",
                project.name
            ),
            project.into_dto(),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/getProject/{id}",
    tag = PROJECT_TAG,
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Project", body = DataDto<ProjectDto>),
        (status = 404, description = "Project not found", body = ErrorDto)
    ),
)]
pub async fn get_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let project = ProjectService::new(&state.db, &state.hub).get(&id).await?;

    Ok((StatusCode::OK, Json(DataDto::new(project.into_dto()))))
}

/// List projects newest first. Non-admins only see projects they belong to.
#[utoipa::path(
    get,
    path = "/getAllProjects",
    tag = PROJECT_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Page of projects", body = PageDto<ProjectOverviewDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn get_all_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let projects = ProjectService::new(&state.db, &state.hub)
        .list(&caller, query.to_request(PROJECTS_PAGE_SIZE))
        .await?;

    Ok((
        StatusCode::OK,
        Json(projects.into_dto(
            Some("Projects retrieved successfully"),
            ProjectOverview::into_dto,
        )),
    ))
}

/// Get the profiles of a project's members.
#[utoipa::path(
    get,
    path = "/getUsersByProject/{id}",
    tag = PROJECT_TAG,
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Team members", body = DataDto<Vec<UserDto>>),
        (status = 404, description = "Project not found", body = ErrorDto)
    ),
)]
pub async fn get_users_by_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let members = ProjectService::new(&state.db, &state.hub)
        .members(&id)
        .await?;
    let members: Vec<UserDto> = members.into_iter().map(User::into_dto).collect();

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            "Team members retrieved successfully",
            members,
        )),
    ))
}

/// Get a project's members with their task counters for the project dashboard.
#[utoipa::path(
    get,
    path = "/getMembersForProjDashboard/{id}",
    tag = PROJECT_TAG,
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Members with task counters", body = DataDto<Vec<MemberStatsDto>>),
        (status = 404, description = "Project not found or without members", body = ErrorDto)
    ),
)]
pub async fn get_members_for_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let members = ProjectService::new(&state.db, &state.hub)
        .members_with_stats(&id)
        .await?;
    let members: Vec<MemberStatsDto> = members.into_iter().map(MemberStats::into_dto).collect();

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            "Team members retrieved successfully",
            members,
        )),
    ))
}

/// Update a project. Empty fields are left unchanged.
#[utoipa::path(
    put,
    path = "/updateProject/{id}",
    tag = PROJECT_TAG,
    params(
        ("id" = String, Path, description = "Project id")
    ),
    request_body = UpdateProjectDto,
    responses(
        (status = 200, description = "Project updated", body = DataDto<ProjectDto>),
        (status = 400, description = "Invalid status", body = ErrorDto),
        (status = 404, description = "Project or member not found", body = ErrorDto)
    ),
)]
pub async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProjectDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let params = UpdateProjectParams::from_dto(payload)?;
    let project = ProjectService::new(&state.db, &state.hub)
        .update(&id, params)
        .await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            format!("Project ({}) updated successfully", project.name),
            project.into_dto(),
        )),
    ))
}

/// Delete a project with its tasks.
#[utoipa::path(
    delete,
    path = "/deleteProject/{id}",
    tag = PROJECT_TAG,
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Project deleted", body = MessageDto),
        (status = 404, description = "Project not found", body = ErrorDto)
    ),
)]
pub async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let project = ProjectService::new(&state.db, &state.hub)
        .delete(&id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(format!(
            "Project ({}) and associated tasks deleted successfully",
            project.name
        ))),
    ))
}
