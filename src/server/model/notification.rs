//! Notification domain models and parameters.

use chrono::{DateTime, Utc};

use crate::{
    model::notification::{NotificationDto, NotificationKind},
    server::{error::internal::InternalError, util::parse},
};

/// Stored notification addressed to one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    /// External id of the recipient.
    pub user: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Converts an entity model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - Notification row
    /// - `user` - External id of the recipient
    ///
    /// # Returns
    /// - `Ok(Notification)` - Converted notification
    /// - `Err(InternalError::InvalidStoredValue)` - Stored type is unknown
    pub fn from_entity(
        entity: entity::notification::Model,
        user: String,
    ) -> Result<Self, InternalError> {
        Ok(Self {
            id: entity.uuid,
            kind: parse::stored("notification.type", &entity.kind)?,
            message: entity.message,
            user,
            is_read: entity.is_read,
            created_at: entity.created_at,
        })
    }

    pub fn into_dto(self) -> NotificationDto {
        NotificationDto {
            id: self.id,
            kind: self.kind,
            message: self.message,
            user: self.user,
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}

/// Parameters for storing a notification.
#[derive(Debug, Clone)]
pub struct CreateNotificationParams {
    pub kind: NotificationKind,
    pub message: String,
    /// External id of the recipient.
    pub user: String,
}

impl CreateNotificationParams {
    /// Informational notification, the kind every automatic notification uses.
    pub fn info(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
            user: user.into(),
        }
    }
}

/// Selection of notifications for the listing endpoints. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    /// Recipient external id.
    pub user: Option<String>,
    pub kind: Option<NotificationKind>,
    pub is_read: Option<bool>,
}
