//! Notification factory for creating test notification entities.

use crate::factory::helpers::{new_uuid, next_id};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test notifications.
///
/// # Example
///
/// ```rust,ignore
/// let notification = NotificationFactory::new(&db, user.id)
///     .kind("warning")
///     .read(true)
///     .build()
///     .await?;
/// ```
pub struct NotificationFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    kind: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl<'a> NotificationFactory<'a> {
    /// Creates a new unread `"info"` notification factory for the given user.
    pub fn new(db: &'a DatabaseConnection, user_id: i32) -> Self {
        Self {
            db,
            user_id,
            kind: "info".to_string(),
            message: format!("Notification {}", next_id()),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Sets the type (`"info"`, `"success"`, `"error"`, `"warning"` or `"admin"`).
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the notification entity into the database.
    pub async fn build(self) -> Result<entity::notification::Model, DbErr> {
        entity::notification::ActiveModel {
            uuid: ActiveValue::Set(new_uuid()),
            kind: ActiveValue::Set(self.kind),
            message: ActiveValue::Set(self.message),
            user_id: ActiveValue::Set(self.user_id),
            is_read: ActiveValue::Set(self.is_read),
            created_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an unread info notification for the given user.
pub async fn create_notification(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<entity::notification::Model, DbErr> {
    NotificationFactory::new(db, user_id).build().await
}
