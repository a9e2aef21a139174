use axum::http::HeaderValue;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3008";
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_SMTP_PORT: u16 = 465;

/// SMTP relay settings. Mail is disabled when these are absent.
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Credentials for the admin account created on first start.
#[derive(Clone, Debug)]
pub struct AdminSeed {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub frontend_origin: String,
    /// Origins allowed by CORS, always including the local development frontend.
    pub allowed_origins: Vec<HeaderValue>,
    pub static_dir: String,
    pub smtp: Option<SmtpConfig>,
    pub admin_seed: Option<AdminSeed>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let frontend_origin =
            optional_var("FRONTEND_ORIGIN").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string());

        let mut allowed_origins = vec![parse_origin("FRONTEND_ORIGIN", &frontend_origin)?];
        if frontend_origin != DEFAULT_FRONTEND_ORIGIN {
            allowed_origins.push(HeaderValue::from_static(DEFAULT_FRONTEND_ORIGIN));
        }

        Ok(Self {
            database_url: required_var("DATABASE_URL")?,
            jwt_secret: required_var("JWT_SECRET")?,
            bind_addr: optional_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            frontend_origin,
            allowed_origins,
            static_dir: optional_var("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            smtp: smtp_from_env()?,
            admin_seed: admin_seed_from_env(),
        })
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    optional_var(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Reads a variable, treating an empty value as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_origin(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn smtp_from_env() -> Result<Option<SmtpConfig>, ConfigError> {
    let (Some(host), Some(username), Some(password)) = (
        optional_var("SMTP_HOST"),
        optional_var("SMTP_USERNAME"),
        optional_var("SMTP_PASSWORD"),
    ) else {
        return Ok(None);
    };

    let port = match optional_var("SMTP_PORT") {
        Some(port) => port.parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
            name: "SMTP_PORT".to_string(),
            reason: e.to_string(),
        })?,
        None => DEFAULT_SMTP_PORT,
    };

    let from = optional_var("MAIL_FROM").unwrap_or_else(|| username.clone());

    Ok(Some(SmtpConfig {
        host,
        port,
        username,
        password,
        from,
    }))
}

fn admin_seed_from_env() -> Option<AdminSeed> {
    Some(AdminSeed {
        name: optional_var("ADMIN_NAME")?,
        username: optional_var("ADMIN_USERNAME")?,
        email: optional_var("ADMIN_EMAIL")?,
        password: optional_var("ADMIN_PASSWORD")?,
    })
}
