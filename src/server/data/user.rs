//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing accounts: creation, lookups by
//! external id, username, email or reset token, filtered listings, profile updates and
//! deletion with cleanup of everything the account owns.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, LikeExpr}, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::user::Role,
    server::{
        error::AppError,
        model::{
            page::{PageRequest, Paginated},
            user::{
                CreateUserParams, PasswordReset, UpdateUserParams, User, UserCredentials,
                UserFilter,
            },
        },
        util::parse,
    },
};

/// Repository providing database operations for user management.
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new account with a fresh external id.
    ///
    /// # Arguments
    /// - `params` - Account fields with the password already hashed
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(AppError::DbErr)` - Database error, including unique constraint violations
    pub async fn create(&self, params: CreateUserParams) -> Result<User, AppError> {
        let now = Utc::now();

        let entity = entity::user::ActiveModel {
            uuid: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
            name: ActiveValue::Set(params.name),
            username: ActiveValue::Set(params.username),
            email: ActiveValue::Set(params.email),
            gender: ActiveValue::Set(params.gender.to_string()),
            password_hash: ActiveValue::Set(params.password_hash),
            role: ActiveValue::Set(params.role.to_string()),
            avatar: ActiveValue::Set(params.avatar),
            reset_password_token: ActiveValue::Set(None),
            reset_password_expires: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            last_login: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity)?)
    }

    /// Finds a user by external id.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that id
    /// - `Err(AppError)` - Database error or invalid stored data
    pub async fn find_by_uuid(&self, uuid: &str) -> Result<Option<User>, AppError> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Uuid.eq(uuid))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity).transpose()?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity).transpose()?)
    }

    /// Finds every user whose external id is in `uuids`.
    ///
    /// Unknown ids are skipped, so callers compare lengths to detect them. Results keep
    /// the order of `uuids`.
    pub async fn find_by_uuids(&self, uuids: &[String]) -> Result<Vec<User>, AppError> {
        if uuids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::User::find()
            .filter(entity::user::Column::Uuid.is_in(uuids.iter().cloned()))
            .all(self.db)
            .await?;

        let mut users = entities
            .into_iter()
            .map(User::from_entity)
            .collect::<Result<Vec<_>, _>>()?;
        users.sort_by_key(|user| uuids.iter().position(|uuid| *uuid == user.id));

        Ok(users)
    }

    /// Finds every user whose username is in `usernames`, keeping their order.
    pub async fn find_by_usernames(&self, usernames: &[String]) -> Result<Vec<User>, AppError> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::User::find()
            .filter(entity::user::Column::Username.is_in(usernames.iter().cloned()))
            .all(self.db)
            .await?;

        let mut users = entities
            .into_iter()
            .map(User::from_entity)
            .collect::<Result<Vec<_>, _>>()?;
        users.sort_by_key(|user| usernames.iter().position(|name| *name == user.username));

        Ok(users)
    }

    /// Loads a user together with their password hash for login.
    pub async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let Some(entity) = entity::prelude::User::find()
            .filter(entity::user::Column::Username.eq(username))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let password_hash = entity.password_hash.clone();

        Ok(Some(UserCredentials {
            user: User::from_entity(entity)?,
            password_hash,
        }))
    }

    /// Checks whether a username belongs to an account other than `except`.
    ///
    /// # Arguments
    /// - `username` - Username to check
    /// - `except` - External id of the account being edited, if any
    pub async fn username_taken(
        &self,
        username: &str,
        except: Option<&str>,
    ) -> Result<bool, AppError> {
        let mut query =
            entity::prelude::User::find().filter(entity::user::Column::Username.eq(username));
        if let Some(uuid) = except {
            query = query.filter(entity::user::Column::Uuid.ne(uuid));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Checks whether an email belongs to an account other than `except`.
    pub async fn email_taken(&self, email: &str, except: Option<&str>) -> Result<bool, AppError> {
        let mut query = entity::prelude::User::find().filter(entity::user::Column::Email.eq(email));
        if let Some(uuid) = except {
            query = query.filter(entity::user::Column::Uuid.ne(uuid));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Checks if any admin account exists.
    pub async fn admin_exists(&self) -> Result<bool, AppError> {
        let count = entity::prelude::User::find()
            .filter(entity::user::Column::Role.eq(Role::Admin.as_ref()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Gets a page of users ordered by name.
    ///
    /// # Arguments
    /// - `filter` - Optional search text and role
    /// - `page` - Requested page
    ///
    /// # Returns
    /// - `Ok(Paginated<User>)` - Users of the page and the total match count
    /// - `Err(AppError)` - Database error or invalid stored data
    pub async fn get_paginated(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>, AppError> {
        let mut query = entity::prelude::User::find();

        if let Some(search) = &filter.search {
            let pattern = LikeExpr::new(parse::like_contains(search)).escape('\\');
            query = query.filter(
                Condition::any()
                    .add(entity::user::Column::Name.like(pattern.clone()))
                    .add(entity::user::Column::Email.like(pattern.clone()))
                    .add(entity::user::Column::Username.like(pattern)),
            );
        }
        if let Some(role) = filter.role {
            query = query.filter(entity::user::Column::Role.eq(role.as_ref()));
        }

        let total = query.clone().count(self.db).await?;
        let users = query
            .order_by_asc(entity::user::Column::Name)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?
            .into_iter()
            .map(User::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(users, total, page))
    }

    /// Applies a partial update to an account.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Updated user
    /// - `Ok(None)` - No user with that id
    /// - `Err(AppError)` - Database error or invalid stored data
    pub async fn update(
        &self,
        uuid: &str,
        params: UpdateUserParams,
    ) -> Result<Option<User>, AppError> {
        let Some(entity) = entity::prelude::User::find()
            .filter(entity::user::Column::Uuid.eq(uuid))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(name) = params.name {
            active.name = ActiveValue::Set(name);
        }
        if let Some(username) = params.username {
            active.username = ActiveValue::Set(username);
        }
        if let Some(email) = params.email {
            active.email = ActiveValue::Set(email);
        }
        if let Some(gender) = params.gender {
            active.gender = ActiveValue::Set(gender.to_string());
        }
        if let Some(avatar) = params.avatar {
            active.avatar = ActiveValue::Set(avatar);
        }
        if let Some(password_hash) = params.password_hash {
            active.password_hash = ActiveValue::Set(password_hash);
        }
        if let Some(role) = params.role {
            active.role = ActiveValue::Set(role.to_string());
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(self.db).await?;

        Ok(Some(User::from_entity(updated)?))
    }

    /// Records a successful login and returns the refreshed user.
    pub async fn touch_last_login(&self, uuid: &str) -> Result<Option<User>, AppError> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Uuid.eq(uuid))
            .col_expr(entity::user::Column::LastLogin, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;

        self.find_by_uuid(uuid).await
    }

    /// Stores a password reset token and its expiry on an account.
    pub async fn set_reset_token(
        &self,
        uuid: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Uuid.eq(uuid))
            .col_expr(
                entity::user::Column::ResetPasswordToken,
                Expr::value(token.to_string()),
            )
            .col_expr(
                entity::user::Column::ResetPasswordExpires,
                Expr::value(expires_at),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Finds the account holding a reset token, expired or not.
    pub async fn find_by_reset_token(&self, token: &str) -> Result<Option<PasswordReset>, AppError> {
        let Some(entity) = entity::prelude::User::find()
            .filter(entity::user::Column::ResetPasswordToken.eq(token))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let password_hash = entity.password_hash.clone();
        let expires_at = entity.reset_password_expires;

        Ok(Some(PasswordReset {
            user: User::from_entity(entity)?,
            password_hash,
            expires_at,
        }))
    }

    /// Replaces the password hash and clears any pending reset token.
    pub async fn reset_password(&self, uuid: &str, password_hash: String) -> Result<(), AppError> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Uuid.eq(uuid))
            .col_expr(entity::user::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(
                entity::user::Column::ResetPasswordToken,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                entity::user::Column::ResetPasswordExpires,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(entity::user::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Deletes an account and everything it owns.
    ///
    /// Tasks assigned to the user are unassigned. Their notifications, comments and
    /// memberships are removed, as are the projects and tasks they created together with
    /// the tasks and comments hanging off those.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - The deleted user
    /// - `Ok(None)` - No user with that id
    /// - `Err(AppError)` - Database error or invalid stored data
    pub async fn delete(&self, uuid: &str) -> Result<Option<User>, AppError> {
        let Some(entity) = entity::prelude::User::find()
            .filter(entity::user::Column::Uuid.eq(uuid))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };
        let id = entity.id;
        let user = User::from_entity(entity)?;

        entity::prelude::Task::update_many()
            .filter(entity::task::Column::AssignedToId.eq(id))
            .col_expr(
                entity::task::Column::AssignedToId,
                Expr::value(Option::<i32>::None),
            )
            .exec(self.db)
            .await?;

        let owned_projects: Vec<i32> = entity::prelude::Project::find()
            .select_only()
            .column(entity::project::Column::Id)
            .filter(entity::project::Column::CreatedById.eq(id))
            .into_tuple()
            .all(self.db)
            .await?;

        let doomed_tasks: Vec<i32> = entity::prelude::Task::find()
            .select_only()
            .column(entity::task::Column::Id)
            .filter(
                Condition::any()
                    .add(entity::task::Column::CreatedById.eq(id))
                    .add(entity::task::Column::ProjectId.is_in(owned_projects.clone())),
            )
            .into_tuple()
            .all(self.db)
            .await?;

        entity::prelude::Comment::delete_many()
            .filter(
                Condition::any()
                    .add(entity::comment::Column::AuthorId.eq(id))
                    .add(entity::comment::Column::TaskId.is_in(doomed_tasks.clone())),
            )
            .exec(self.db)
            .await?;

        entity::prelude::Task::delete_many()
            .filter(entity::task::Column::Id.is_in(doomed_tasks))
            .exec(self.db)
            .await?;

        entity::prelude::ProjectMember::delete_many()
            .filter(
                Condition::any()
                    .add(entity::project_member::Column::UserId.eq(id))
                    .add(entity::project_member::Column::ProjectId.is_in(owned_projects.clone())),
            )
            .exec(self.db)
            .await?;

        entity::prelude::Project::delete_many()
            .filter(entity::project::Column::Id.is_in(owned_projects))
            .exec(self.db)
            .await?;

        entity::prelude::Notification::delete_many()
            .filter(entity::notification::Column::UserId.eq(id))
            .exec(self.db)
            .await?;

        entity::prelude::User::delete_by_id(id).exec(self.db).await?;

        Ok(Some(user))
    }
}
