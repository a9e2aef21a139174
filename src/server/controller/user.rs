use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{DataDto, ErrorDto, MessageDto},
        user::{
            ContactDto, ForgotPasswordDto, LoginDto, RegisterDto, ResetPasswordDto,
            ResetTokenDto, Role, UpdateUserDto, UserDto, UserWithTokenDto, UsersPageDto,
        },
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::user::{RegisterParams, UpdateProfileParams, User, UserFilter},
        service::{
            mail::MailTheme,
            user::{ContactParams, ResetRequest, UserService},
        },
        state::AppState,
        util::parse,
    },
};

/// Tag for grouping user endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

const USERS_PAGE_SIZE: u64 = 5;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Substring of name, email or username.
    pub search: Option<String>,
    pub role: Option<String>,
}

/// Log in with username and password.
///
/// # Returns
/// - `200 OK` - Token in `data`, welcome message in `message`
/// - `400 Bad Request` - Username or password missing
/// - `401 Unauthorized` - Unknown username or wrong password
#[utoipa::path(
    post,
    path = "/login",
    tag = USER_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = DataDto<String>),
        (status = 400, description = "Missing credentials", body = ErrorDto),
        (status = 401, description = "Invalid username or password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = UserService::new(&state.db)
        .login(payload.username, payload.password, &state.jwt)
        .await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(format!("Welcome {}", user.name), token)),
    ))
}

/// Log out. Tokens are stateless, so this only acknowledges the request.
#[utoipa::path(
    post,
    path = "/logout",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Logged out", body = MessageDto)
    ),
)]
pub async fn logout() -> impl IntoResponse {
    (StatusCode::OK, Json(MessageDto::new("Logged out successfully")))
}

/// Register an account.
///
/// Anonymous callers may register plain users. A logged in admin may also add managers
/// and is exempt from the password policy. Admin accounts cannot be registered.
///
/// # Returns
/// - `201 Created` - Account created
/// - `400 Bad Request` - Invalid field
/// - `403 Forbidden` - Requested role not allowed for the caller
/// - `409 Conflict` - Username or email taken
#[utoipa::path(
    post,
    path = "/register",
    tag = USER_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = MessageDto),
        (status = 400, description = "Invalid registration data", body = ErrorDto),
        (status = 403, description = "Role not allowed", body = ErrorDto),
        (status = 409, description = "Username or email already exists", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .optional()
        .await?;

    let user = UserService::new(&state.db)
        .register(RegisterParams::from_dto(payload), caller.as_ref())
        .await?;

    let message = if user.role == Role::Manager {
        format!("Manager ({}) Added Successfully", user.name)
    } else {
        format!("User ({}) registered successfully", user.name)
    };

    Ok((StatusCode::CREATED, Json(MessageDto::new(message))))
}

/// Get a user profile.
///
/// # Access Control
/// - `Manager` - Managers and admins
#[utoipa::path(
    get,
    path = "/getUser/{id}",
    tag = USER_TAG,
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User profile", body = DataDto<UserDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a manager", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Manager])
        .await?;

    let user = UserService::new(&state.db).get(&id).await?;

    Ok((StatusCode::OK, Json(DataDto::new(user.into_dto()))))
}

/// List users with optional search and role filter.
///
/// # Access Control
/// - `Admin` - Only admins can list accounts
#[utoipa::path(
    get,
    path = "/getUsers",
    tag = USER_TAG,
    params(UserListQuery),
    responses(
        (status = 200, description = "Page of users", body = DataDto<UsersPageDto>),
        (status = 400, description = "Invalid role filter", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let filter = UserFilter {
        search: parse::present(query.search),
        role: parse::variant(query.role, "Invalid role")?,
    };
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .to_request(USERS_PAGE_SIZE);

    let users = UserService::new(&state.db).list(filter, page).await?;
    let total_pages = users.total_pages();

    Ok((
        StatusCode::OK,
        Json(DataDto::new(UsersPageDto {
            total_docs: users.total,
            total_pages,
            current_page: users.page,
            users: users.items.into_iter().map(User::into_dto).collect(),
        })),
    ))
}

/// Update a profile and return it with a fresh token.
///
/// # Access Control
/// - The user themselves or an admin. Only admins may change roles.
#[utoipa::path(
    put,
    path = "/updateUser/{id}",
    tag = USER_TAG,
    params(
        ("id" = String, Path, description = "User id")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Profile updated", body = DataDto<UserWithTokenDto>),
        (status = 400, description = "Invalid field", body = ErrorDto),
        (status = 403, description = "Not allowed to edit this user", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 409, description = "Username or email already exists", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let (user, token) = UserService::new(&state.db)
        .update(&id, UpdateProfileParams::from_dto(payload), &caller, &state.jwt)
        .await?;

    Ok((
        StatusCode::OK,
        Json(DataDto::with_message(
            format!("User ({}) updated successfully", user.name),
            UserWithTokenDto {
                user: user.into_dto(),
                token,
            },
        )),
    ))
}

/// Delete an account and everything it owns.
///
/// # Access Control
/// - `Admin` - Only admins can delete accounts
#[utoipa::path(
    delete,
    path = "/deleteUser/{id}",
    tag = USER_TAG,
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let user = UserService::new(&state.db).delete(&id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(format!(
            "User ({}) deleted successfully",
            user.name
        ))),
    ))
}

/// Start a password reset.
///
/// With `isedit` a logged in user receives the token directly to change their own password
/// in the app (admins may do so for any account); otherwise the reset link is emailed.
#[utoipa::path(
    post,
    path = "/forgotPassword",
    tag = USER_TAG,
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Reset link sent, or token returned for in-app changes", body = MessageDto),
        (status = 400, description = "Email missing", body = ErrorDto),
        (status = 401, description = "In-app change without valid login", body = ErrorDto),
        (status = 403, description = "In-app change for another user's account", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ForgotPasswordDto>,
) -> Result<Response, AppError> {
    let caller = if payload.isedit.unwrap_or(false) {
        Some(
            AuthGuard::new(&state.db, &state.jwt, &headers)
                .require(&[])
                .await?,
        )
    } else {
        None
    };

    let theme = MailTheme::from_request(payload.theme.as_deref());
    let request = UserService::new(&state.db)
        .request_password_reset(payload.email, caller.as_ref(), theme, &state.mailer)
        .await?;

    let response = match request {
        ResetRequest::Token(reset_token) => (
            StatusCode::OK,
            Json(DataDto::new(ResetTokenDto { reset_token })),
        )
            .into_response(),
        ResetRequest::Mailed => (
            StatusCode::OK,
            Json(MessageDto::new("Password reset link sent successfully")),
        )
            .into_response(),
    };

    Ok(response)
}

/// Check that a password reset token exists and has not expired.
///
/// Served under both `/verifyRestToken/{token}` and `/verifyResetToken/{token}`.
#[utoipa::path(
    post,
    path = "/verifyResetToken/{token}",
    tag = USER_TAG,
    params(
        ("token" = String, Path, description = "Password reset token")
    ),
    responses(
        (status = 200, description = "Token is valid", body = MessageDto),
        (status = 400, description = "Token missing, invalid or expired", body = ErrorDto)
    ),
)]
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    UserService::new(&state.db)
        .verify_reset_token(&token)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Password reset token is valid")),
    ))
}

/// Set a new password using a reset token.
///
/// In `ChangePassword` mode the current password must be supplied as `oldpassword`.
#[utoipa::path(
    post,
    path = "/resetPassword/{token}",
    tag = USER_TAG,
    params(
        ("token" = String, Path, description = "Password reset token")
    ),
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageDto),
        (status = 400, description = "Bad token, wrong old password or weak password", body = ErrorDto)
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    UserService::new(&state.db)
        .reset_password(&token, payload.password, payload.oldpassword, payload.mode)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Password has been reset successfully")),
    ))
}

/// Submit the contact form. The team mailbox receives the message and the sender an
/// acknowledgement.
#[utoipa::path(
    post,
    path = "/contactUs",
    tag = USER_TAG,
    request_body = ContactDto,
    responses(
        (status = 200, description = "Message sent", body = MessageDto),
        (status = 400, description = "Missing field, invalid email or suspicious input", body = ErrorDto),
        (status = 500, description = "Mail delivery failed", body = ErrorDto)
    ),
)]
pub async fn contact_us(
    State(state): State<AppState>,
    Json(payload): Json<ContactDto>,
) -> Result<impl IntoResponse, AppError> {
    UserService::new(&state.db)
        .contact(
            ContactParams {
                name: payload.name,
                email: payload.email,
                message: payload.message,
                theme: payload.theme,
            },
            &state.mailer,
        )
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Message sent successfully"))))
}
