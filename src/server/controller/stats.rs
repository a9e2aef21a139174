use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{DataDto, ErrorDto, PageDto},
        stats::{ProjectTaskStatsDto, RecentActivityDto, StatisticsDto, UserStatsDto},
    },
    server::{
        controller::PageQuery, error::AppError, middleware::auth::AuthGuard,
        model::stats::ProjectTaskStats, service::stats::StatsService, state::AppState,
    },
};

/// Tag for grouping dashboard statistics endpoints in OpenAPI documentation
pub static STATS_TAG: &str = "stats";

const PROJECT_STATS_PAGE_SIZE: u64 = 5;

/// Dashboard totals with percentages and the monthly history of the last 7 months.
#[utoipa::path(
    get,
    path = "/getStatistics",
    tag = STATS_TAG,
    responses(
        (status = 200, description = "Totals and history", body = DataDto<StatisticsDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn get_statistics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let stats = StatsService::new(&state.db).statistics().await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            "Statistics retrieved successfully",
            stats.into_dto(),
        )),
    ))
}

/// Activity counters for the last 7 days.
#[utoipa::path(
    get,
    path = "/getRecentActivity",
    tag = STATS_TAG,
    responses(
        (status = 200, description = "Recent activity", body = DataDto<RecentActivityDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn get_recent_activity(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let activity = StatsService::new(&state.db).recent_activity().await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            "Recent activity retrieved successfully",
            activity.into_dto(),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/getProjectTaskStats",
    tag = STATS_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Per-project task counters", body = PageDto<ProjectTaskStatsDto>),
        (status = 404, description = "No projects found", body = ErrorDto)
    ),
)]
pub async fn get_project_task_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let stats = StatsService::new(&state.db)
        .project_task_stats(query.to_request(PROJECT_STATS_PAGE_SIZE))
        .await?;

    Ok((
        StatusCode::OK,
        Json(stats.into_dto(
            Some("Project task statistics retrieved successfully"),
            ProjectTaskStats::into_dto,
        )),
    ))
}

/// Activity counters of the logged in user.
#[utoipa::path(
    get,
    path = "/getUserStats",
    tag = STATS_TAG,
    responses(
        (status = 200, description = "Caller's counters", body = DataDto<UserStatsDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn get_user_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let stats = StatsService::new(&state.db).user_stats(&caller.id).await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            "User statistics retrieved successfully",
            stats.into_dto(),
        )),
    ))
}
