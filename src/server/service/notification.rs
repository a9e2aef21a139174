//! Notification service for business logic.
//!
//! Stores notifications and pushes each new one to the recipient's live connections.
//! Non-admin callers only ever see and modify notifications addressed to them.

use sea_orm::DatabaseConnection;

use crate::{
    model::{notification::NotificationKind, socket::ServerEvent},
    server::{
        data::{notification::NotificationRepository, user::UserRepository},
        error::AppError,
        model::{
            notification::{CreateNotificationParams, Notification, NotificationFilter},
            page::{PageRequest, Paginated},
            user::User,
        },
        service::notifier::NotificationHub,
        util::parse,
    },
};

/// Longest accepted notification message, in characters.
pub const MAX_MESSAGE_LEN: usize = 255;

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
    hub: &'a NotificationHub,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection, hub: &'a NotificationHub) -> Self {
        Self { db, hub }
    }

    /// Stores a notification and pushes it to the recipient.
    ///
    /// Used for the notifications raised by project and task changes; no duplicate check.
    pub async fn notify(&self, params: CreateNotificationParams) -> Result<Notification, AppError> {
        let notification = NotificationRepository::new(self.db).create(params).await?;

        self.hub
            .push(
                &notification.user,
                ServerEvent::NewNotification(notification.clone().into_dto()),
            )
            .await;

        Ok(notification)
    }

    /// Validates and stores a notification sent through the API, then pushes it.
    ///
    /// # Arguments
    /// - `kind` - Raw notification type
    /// - `message` - Text, at most 255 characters
    /// - `user` - Recipient external id
    ///
    /// # Returns
    /// - `Ok(Notification)` - Stored notification
    /// - `Err(AppError::BadRequest)` - Missing field, unknown type or message too long
    /// - `Err(AppError::NotFound)` - Recipient does not exist
    /// - `Err(AppError::Conflict)` - Same type and message already sent to the user
    pub async fn add(
        &self,
        kind: Option<String>,
        message: Option<String>,
        user: Option<String>,
    ) -> Result<Notification, AppError> {
        let (Some(kind), Some(message), Some(user)) = (
            parse::present(kind),
            parse::present(message),
            parse::present(user),
        ) else {
            return Err(AppError::bad_request("Type, message, and user are required"));
        };

        if UserRepository::new(self.db).find_by_uuid(&user).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let kind: NotificationKind = parse::variant(Some(kind), "Invalid notification type")?
            .ok_or_else(|| AppError::bad_request("Invalid notification type"))?;

        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(AppError::bad_request("Message is too long"));
        }

        let params = CreateNotificationParams {
            kind,
            message,
            user,
        };
        if NotificationRepository::new(self.db).exists(&params).await? {
            return Err(AppError::Conflict("Notification already exists".to_string()));
        }

        self.notify(params).await
    }

    /// Lists the notifications of a user, newest first.
    ///
    /// Admins get every notification regardless of `user`. `unread_only` selects
    /// unread (`Some(true)`) or read (`Some(false)`) notifications.
    ///
    /// # Returns
    /// - `Ok(Paginated<Notification>)` - Page of notifications
    /// - `Err(AppError::NotFound)` - Non-admin caller and unknown user
    /// - `Err(AppError::Forbidden)` - Non-admin caller asking for someone else
    pub async fn list_for_user(
        &self,
        user: &str,
        unread_only: Option<bool>,
        caller: &User,
        page: PageRequest,
    ) -> Result<Paginated<Notification>, AppError> {
        let mut filter = NotificationFilter {
            is_read: unread_only.map(|unread| !unread),
            ..Default::default()
        };

        if !caller.is_admin() {
            if UserRepository::new(self.db).find_by_uuid(user).await?.is_none() {
                return Err(AppError::not_found("User not found"));
            }
            if caller.id != user {
                return Err(AppError::forbidden("Unauthorized access"));
            }
            filter.user = Some(user.to_string());
        }

        NotificationRepository::new(self.db)
            .get_paginated(&filter, page)
            .await
    }

    /// Gets one notification.
    pub async fn get(&self, id: &str, caller: &User) -> Result<Notification, AppError> {
        let notification = self.find(id).await?;
        ensure_recipient(&notification, caller)?;

        Ok(notification)
    }

    /// Lists notifications of a type.
    ///
    /// Admins may omit the type and see everyone's notifications; other callers must
    /// name a type and only see their own.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Non-admin caller without type, or unknown type
    /// - `Err(AppError::NotFound)` - Nothing on the requested page
    pub async fn list_by_kind(
        &self,
        kind: Option<String>,
        caller: &User,
        page: PageRequest,
    ) -> Result<Paginated<Notification>, AppError> {
        let kind: Option<NotificationKind> = parse::variant(kind, "Invalid notification type")?;

        let mut filter = NotificationFilter {
            kind,
            ..Default::default()
        };
        if !caller.is_admin() {
            if kind.is_none() {
                return Err(AppError::bad_request("Notification type is required"));
            }
            filter.user = Some(caller.id.clone());
        }

        let notifications = NotificationRepository::new(self.db)
            .get_paginated(&filter, page)
            .await?;
        if notifications.is_empty() {
            return Err(AppError::not_found("No notifications found"));
        }

        Ok(notifications)
    }

    /// Marks a notification read or unread.
    pub async fn set_read(
        &self,
        id: &str,
        is_read: bool,
        caller: &User,
    ) -> Result<Notification, AppError> {
        let notification = self.find(id).await?;
        ensure_recipient(&notification, caller)?;

        NotificationRepository::new(self.db)
            .set_read(id, is_read)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Deletes one notification.
    pub async fn delete(&self, id: &str, caller: &User) -> Result<(), AppError> {
        let notification = self.find(id).await?;
        ensure_recipient(&notification, caller)?;

        if !NotificationRepository::new(self.db).delete(id).await? {
            return Err(AppError::not_found("Notification not found"));
        }

        Ok(())
    }

    /// Deletes every notification of a user.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of deleted notifications
    /// - `Err(AppError::NotFound)` - Unknown user or the user had no notifications
    /// - `Err(AppError::Forbidden)` - Caller is neither the user nor an admin
    pub async fn clear(&self, user: &str, caller: &User) -> Result<u64, AppError> {
        if UserRepository::new(self.db).find_by_uuid(user).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }
        if !caller.is_admin() && caller.id != user {
            return Err(AppError::forbidden("Unauthorized access"));
        }

        let deleted = NotificationRepository::new(self.db)
            .delete_for_user(user)
            .await?;
        if deleted == 0 {
            return Err(AppError::not_found("No notifications found for this user"));
        }

        Ok(deleted)
    }

    async fn find(&self, id: &str) -> Result<Notification, AppError> {
        NotificationRepository::new(self.db)
            .find_by_uuid(id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }
}

fn ensure_recipient(notification: &Notification, caller: &User) -> Result<(), AppError> {
    if caller.is_admin() || notification.user == caller.id {
        Ok(())
    } else {
        Err(AppError::forbidden("Unauthorized access"))
    }
}
