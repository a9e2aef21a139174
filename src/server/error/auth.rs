use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No `Authorization` header was sent.
    #[error("Request carried no authorization token")]
    MissingToken,

    /// Token signature is valid but the token expired.
    #[error("Authorization token expired")]
    SessionExpired,

    /// Token could not be decoded or verified.
    #[error("Authorization token is invalid")]
    InvalidCredentials,

    /// Token references a user that no longer exists.
    ///
    /// # Fields
    /// - External id carried by the token
    #[error("User {0} from token not found in database")]
    UserNotInDatabase(String),

    /// User lacks the role required for the route.
    ///
    /// # Fields
    /// - External id of the user
    /// - Description of the denied action, logged only
    #[error("User {0} denied access: {1}")]
    AccessDenied(String, String),

    /// Login with a username that does not exist.
    #[error("Login attempted with unknown username")]
    UnknownUsername,

    /// Login with a wrong password.
    #[error("Login attempted with wrong password")]
    WrongPassword,
}

/// Converts authentication errors into HTTP responses.
///
/// - `MissingToken` / `SessionExpired` / `InvalidCredentials` / `UserNotInDatabase` → 401
/// - `UnknownUsername` / `WrongPassword` → 401 with the login specific message
/// - `AccessDenied` → 403 "You are not authorized"
///
/// The detailed reason is logged at debug level only.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "You must login first"),
            Self::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                "Session Expired, please login again",
            ),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            Self::UserNotInDatabase(_) => (StatusCode::UNAUTHORIZED, "User not found"),
            Self::AccessDenied(_, _) => (StatusCode::FORBIDDEN, "You are not authorized"),
            Self::UnknownUsername => (StatusCode::UNAUTHORIZED, "Invalid username"),
            Self::WrongPassword => (StatusCode::UNAUTHORIZED, "Invalid password"),
        };

        error_response(status, message.to_string())
    }
}
