use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use chrono::{Duration, Utc};

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::auth::{AuthGuard, Permission},
    model::user::User,
    service::auth::JwtKeys,
};
use test_utils::{builder::TestBuilder, factory};

mod optional;
mod require;

const SECRET: &str = "test-secret";

/// Builds request headers carrying `value` as the authorization header.
fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

/// Issues a currently valid token for a stored user.
fn token_for(keys: &JwtKeys, user: entity::user::Model) -> String {
    let user = User::from_entity(user).unwrap();
    keys.issue(&user, Utc::now()).unwrap()
}
