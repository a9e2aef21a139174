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
        notification::{CreateNotificationDto, NotificationDto},
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::AuthGuard,
        model::notification::Notification,
        service::notification::NotificationService,
        state::AppState,
        util::parse,
    },
};

/// Tag for grouping notification endpoints in OpenAPI documentation
pub static NOTIFICATION_TAG: &str = "notification";

const NOTIFICATIONS_PAGE_SIZE: u64 = 10;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NotificationListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// `true` lists unread notifications only, `false` read ones only.
    pub read: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NotificationTypeQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Notification type. Required for non-admin callers.
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub kind: Option<String>,
}

/// Store a notification and push it to the recipient's live connections.
///
/// # Returns
/// - `201 Created` - Notification stored
/// - `400 Bad Request` - Missing field, unknown type or message over 255 characters
/// - `404 Not Found` - Recipient does not exist
/// - `409 Conflict` - Same notification already sent to the user
#[utoipa::path(
    post,
    path = "/addNotification",
    tag = NOTIFICATION_TAG,
    request_body = CreateNotificationDto,
    responses(
        (status = 201, description = "Notification stored", body = DataDto<NotificationDto>),
        (status = 400, description = "Missing or invalid field", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 409, description = "Duplicate notification", body = ErrorDto)
    ),
)]
pub async fn add_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateNotificationDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let notification = NotificationService::new(&state.db, &state.hub)
        .add(payload.kind, payload.message, payload.user)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataDto::with_message(
            "Notification added successfully",
            notification.into_dto(),
        )),
    ))
}

/// List a user's notifications, newest first. Admins get every notification.
#[utoipa::path(
    get,
    path = "/getNotifications/{user_id}",
    tag = NOTIFICATION_TAG,
    params(
        ("user_id" = String, Path, description = "User id"),
        NotificationListQuery
    ),
    responses(
        (status = 200, description = "Page of notifications", body = PageDto<NotificationDto>),
        (status = 403, description = "Another user's notifications", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let unread_only = parse::boolean(query.read);
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .to_request(NOTIFICATIONS_PAGE_SIZE);

    let notifications = NotificationService::new(&state.db, &state.hub)
        .list_for_user(&user_id, unread_only, &caller, page)
        .await?;

    Ok((
        StatusCode::OK,
        Json(notifications.into_dto(
            Some("Notifications retrieved successfully"),
            Notification::into_dto,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/getNotification/{id}",
    tag = NOTIFICATION_TAG,
    params(
        ("id" = String, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Notification", body = DataDto<NotificationDto>),
        (status = 403, description = "Addressed to another user", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto)
    ),
)]
pub async fn get_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let notification = NotificationService::new(&state.db, &state.hub)
        .get(&id, &caller)
        .await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            "Notification retrieved successfully",
            notification.into_dto(),
        )),
    ))
}

/// List notifications of one type. Non-admins must name a type and only see their own.
#[utoipa::path(
    get,
    path = "/getNotificationByType",
    tag = NOTIFICATION_TAG,
    params(NotificationTypeQuery),
    responses(
        (status = 200, description = "Page of notifications", body = PageDto<NotificationDto>),
        (status = 400, description = "Missing or unknown type", body = ErrorDto),
        (status = 404, description = "No notifications found", body = ErrorDto)
    ),
)]
pub async fn get_notifications_by_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NotificationTypeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .to_request(NOTIFICATIONS_PAGE_SIZE);

    let notifications = NotificationService::new(&state.db, &state.hub)
        .list_by_kind(query.kind, &caller, page)
        .await?;

    Ok((
        StatusCode::OK,
        Json(notifications.into_dto(
            Some("Notifications retrieved successfully"),
            Notification::into_dto,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/markAsRead/{id}",
    tag = NOTIFICATION_TAG,
    params(
        ("id" = String, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Marked as read", body = DataDto<NotificationDto>),
        (status = 403, description = "Addressed to another user", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto)
    ),
)]
pub async fn mark_as_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    set_read(state, headers, id, true).await
}

#[utoipa::path(
    put,
    path = "/markAsUnread/{id}",
    tag = NOTIFICATION_TAG,
    params(
        ("id" = String, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Marked as unread", body = DataDto<NotificationDto>),
        (status = 403, description = "Addressed to another user", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto)
    ),
)]
pub async fn mark_as_unread(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    set_read(state, headers, id, false).await
}

async fn set_read(
    state: AppState,
    headers: HeaderMap,
    id: String,
    is_read: bool,
) -> Result<(StatusCode, Json<DataDto<NotificationDto>>), AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let notification = NotificationService::new(&state.db, &state.hub)
        .set_read(&id, is_read, &caller)
        .await?;

    let message = if is_read {
        "Notification marked as read"
    } else {
        "Notification marked as unread"
    };

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(message, notification.into_dto())),
    ))
}

#[utoipa::path(
    delete,
    path = "/deleteNotification/{id}",
    tag = NOTIFICATION_TAG,
    params(
        ("id" = String, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Notification deleted", body = MessageDto),
        (status = 403, description = "Addressed to another user", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto)
    ),
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    NotificationService::new(&state.db, &state.hub)
        .delete(&id, &caller)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Notification deleted successfully")),
    ))
}

/// Delete every notification of a user.
///
/// # Access Control
/// The user themselves or an admin.
#[utoipa::path(
    delete,
    path = "/clearNotifications/{id}",
    tag = NOTIFICATION_TAG,
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Notifications cleared", body = MessageDto),
        (status = 403, description = "Another user's notifications", body = ErrorDto),
        (status = 404, description = "User not found or nothing to clear", body = ErrorDto)
    ),
)]
pub async fn clear_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let deleted = NotificationService::new(&state.db, &state.hub)
        .clear(&id, &caller)
        .await?;

    tracing::debug!("Cleared {} notification(s) of {}", deleted, id);

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Notifications cleared successfully")),
    ))
}
