//! Notification data repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    data::lookup,
    error::{internal::InternalError, AppError},
    model::{
        notification::{CreateNotificationParams, Notification, NotificationFilter},
        page::{PageRequest, Paginated},
    },
};

pub struct NotificationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores an unread notification.
    ///
    /// # Returns
    /// - `Ok(Notification)` - The stored notification
    /// - `Err(AppError::NotFound)` - Recipient does not exist
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn create(&self, params: CreateNotificationParams) -> Result<Notification, AppError> {
        let user_id = lookup::require_user_id(self.db, &params.user).await?;

        let entity = entity::notification::ActiveModel {
            uuid: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
            kind: ActiveValue::Set(params.kind.to_string()),
            message: ActiveValue::Set(params.message),
            user_id: ActiveValue::Set(user_id),
            is_read: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Notification::from_entity(entity, params.user)?)
    }

    /// Checks whether the recipient already has a notification with the same type and text.
    pub async fn exists(&self, params: &CreateNotificationParams) -> Result<bool, AppError> {
        let Some(user_id) = lookup::user_id(self.db, &params.user).await? else {
            return Ok(false);
        };

        let count = entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::Kind.eq(params.kind.as_ref()))
            .filter(entity::notification::Column::Message.eq(params.message.as_str()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Notification>, AppError> {
        match self.find_entity(uuid).await? {
            Some(entity) => Ok(Some(self.convert_one(entity).await?)),
            None => Ok(None),
        }
    }

    /// Gets a page of notifications, newest first.
    ///
    /// A filter naming an unknown user matches nothing.
    pub async fn get_paginated(
        &self,
        filter: &NotificationFilter,
        page: PageRequest,
    ) -> Result<Paginated<Notification>, AppError> {
        let mut condition = Condition::all();

        if let Some(user) = &filter.user {
            let Some(user_id) = lookup::user_id(self.db, user).await? else {
                return Ok(Paginated::new(Vec::new(), 0, page));
            };
            condition = condition.add(entity::notification::Column::UserId.eq(user_id));
        }
        if let Some(kind) = filter.kind {
            condition = condition.add(entity::notification::Column::Kind.eq(kind.as_ref()));
        }
        if let Some(is_read) = filter.is_read {
            condition = condition.add(entity::notification::Column::IsRead.eq(is_read));
        }

        let query = entity::prelude::Notification::find().filter(condition);
        let total = query.clone().count(self.db).await?;
        let entities = query
            .order_by_desc(entity::notification::Column::CreatedAt)
            .order_by_desc(entity::notification::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?;

        let recipient_ids: Vec<i32> = entities.iter().map(|n| n.user_id).collect();
        let recipients = lookup::user_uuids(self.db, recipient_ids).await?;

        let mut notifications = Vec::with_capacity(entities.len());
        for entity in entities {
            let user = recipients.get(&entity.user_id).cloned().ok_or(
                InternalError::DanglingReference {
                    column: "notification.user_id",
                    id: entity.user_id,
                },
            )?;
            notifications.push(Notification::from_entity(entity, user)?);
        }

        Ok(Paginated::new(notifications, total, page))
    }

    /// Sets the read flag.
    ///
    /// # Returns
    /// - `Ok(Some(Notification))` - Updated notification
    /// - `Ok(None)` - No notification with that id
    pub async fn set_read(
        &self,
        uuid: &str,
        is_read: bool,
    ) -> Result<Option<Notification>, AppError> {
        let Some(entity) = self.find_entity(uuid).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        active.is_read = ActiveValue::Set(is_read);
        let updated = active.update(self.db).await?;

        Ok(Some(self.convert_one(updated).await?))
    }

    /// Deletes a notification. Returns whether a row was removed.
    pub async fn delete(&self, uuid: &str) -> Result<bool, AppError> {
        let result = entity::prelude::Notification::delete_many()
            .filter(entity::notification::Column::Uuid.eq(uuid))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes every notification of a user.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of deleted notifications
    pub async fn delete_for_user(&self, user: &str) -> Result<u64, AppError> {
        let Some(user_id) = lookup::user_id(self.db, user).await? else {
            return Ok(0);
        };

        let result = entity::prelude::Notification::delete_many()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn find_entity(
        &self,
        uuid: &str,
    ) -> Result<Option<entity::notification::Model>, AppError> {
        Ok(entity::prelude::Notification::find()
            .filter(entity::notification::Column::Uuid.eq(uuid))
            .one(self.db)
            .await?)
    }

    async fn convert_one(
        &self,
        entity: entity::notification::Model,
    ) -> Result<Notification, AppError> {
        let user: Option<String> = entity::prelude::User::find_by_id(entity.user_id)
            .select_only()
            .column(entity::user::Column::Uuid)
            .into_tuple()
            .one(self.db)
            .await?;
        let user = user.ok_or(InternalError::DanglingReference {
            column: "notification.user_id",
            id: entity.user_id,
        })?;

        Ok(Notification::from_entity(entity, user)?)
    }
}
