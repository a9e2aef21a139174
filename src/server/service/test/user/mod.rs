use super::*;
use crate::{
    model::user::Role,
    server::{
        error::auth::AuthError,
        model::user::{RegisterParams, UpdateProfileParams},
        service::{
            auth::JwtKeys,
            mail::{MailTheme, Mailer},
            user::{ResetRequest, UserService},
        },
    },
};

mod register;

const PASSWORD: &str = "Secret-123";

fn registration(username: &str, role: &str) -> RegisterParams {
    RegisterParams {
        name: Some("Jane Doe".to_string()),
        gender: Some("Female".to_string()),
        email: Some(format!("{}@example.com", username)),
        username: Some(username.to_string()),
        password: Some(PASSWORD.to_string()),
        role: Some(role.to_string()),
    }
}
