//! Application state shared across all request handlers.
//!
//! The state is built once during startup and cloned into every handler through Axum's
//! state extraction. Every field is cheap to clone:
//! - `DatabaseConnection` is a connection pool (clones share the pool)
//! - `JwtKeys` holds the derived signing keys
//! - `NotificationHub` shares its registry behind an `Arc`
//! - `Mailer` shares the SMTP transport pool

use sea_orm::DatabaseConnection;

use crate::server::service::{auth::JwtKeys, mail::Mailer, notifier::NotificationHub};

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,

    /// Keys used to issue and verify login tokens.
    pub jwt: JwtKeys,

    /// Live WebSocket connections that receive new notifications.
    pub hub: NotificationHub,

    /// Outgoing email for password resets and the contact form.
    pub mailer: Mailer,
}

impl AppState {
    /// Creates the application state.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `jwt` - Token keys derived from the configured secret
    /// - `hub` - Notification registry shared with the socket endpoint
    /// - `mailer` - Configured mailer, possibly disabled
    pub fn new(
        db: DatabaseConnection,
        jwt: JwtKeys,
        hub: NotificationHub,
        mailer: Mailer,
    ) -> Self {
        Self {
            db,
            jwt,
            hub,
            mailer,
        }
    }
}
