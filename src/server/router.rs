use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    model::api::ErrorDto,
    server::{
        config::Config,
        controller::{notification, project, socket, stats, task, user},
        state::AppState,
    },
};

#[derive(OpenApi)]
#[openapi(info(
    title = "Taskboard API",
    description = "Projects, tasks, comments and notifications for small teams"
))]
struct ApiDoc;

/// Builds the application router with the OpenAPI document, CORS, request tracing,
/// static files and the notification socket.
pub fn router(config: &Config) -> Router<AppState> {
    let (api_routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        // user
        .routes(routes!(user::login))
        .routes(routes!(user::logout))
        .routes(routes!(user::register))
        .routes(routes!(user::get_user))
        .routes(routes!(user::get_users))
        .routes(routes!(user::update_user))
        .routes(routes!(user::delete_user))
        .routes(routes!(user::forgot_password))
        .routes(routes!(user::verify_reset_token))
        .routes(routes!(user::reset_password))
        .routes(routes!(user::contact_us))
        // project
        .routes(routes!(project::add_project))
        .routes(routes!(project::assign_team_members))
        .routes(routes!(project::get_project))
        .routes(routes!(project::get_all_projects))
        .routes(routes!(project::get_users_by_project))
        .routes(routes!(project::get_members_for_dashboard))
        .routes(routes!(project::update_project))
        .routes(routes!(project::delete_project))
        // task
        .routes(routes!(task::add_task))
        .routes(routes!(task::get_task))
        .routes(routes!(task::get_tasks_by_project))
        .routes(routes!(task::get_tasks_assigned_to_user))
        .routes(routes!(task::get_tasks_created_by_user))
        .routes(routes!(task::get_tasks_assigned_or_created))
        .routes(routes!(task::update_task))
        .routes(routes!(task::delete_task))
        .routes(routes!(task::add_comment_to_task))
        .routes(routes!(task::get_comments_for_task))
        .routes(routes!(task::update_comment))
        .routes(routes!(task::delete_comment))
        // notification
        .routes(routes!(notification::add_notification))
        .routes(routes!(notification::get_notifications))
        .routes(routes!(notification::get_notification))
        .routes(routes!(notification::get_notifications_by_type))
        .routes(routes!(notification::mark_as_read))
        .routes(routes!(notification::mark_as_unread))
        .routes(routes!(notification::delete_notification))
        .routes(routes!(notification::clear_notifications))
        // stats
        .routes(routes!(stats::get_statistics))
        .routes(routes!(stats::get_recent_activity))
        .routes(routes!(stats::get_project_task_stats))
        .routes(routes!(stats::get_user_stats))
        .split_for_parts();

    let cors = CorsLayer::new()
        .allow_origin(config.allowed_origins.clone())
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    api_routes
        // Misspelled path kept for existing clients.
        .route("/verifyRestToken/{token}", post(user::verify_reset_token))
        .route("/socket", get(socket::notification_socket))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api))
        .fallback(wrong_path)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn wrong_path() -> (StatusCode, Json<ErrorDto>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDto {
            error: "Wrong Path".to_string(),
        }),
    )
}
