//! User factory for creating test user entities.

use crate::factory::helpers::{new_uuid, next_id};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Hash stored when no password is configured; matches no input.
const UNUSABLE_HASH: &str = "!";

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let admin = UserFactory::new(&db)
///     .username("root")
///     .role("admin")
///     .password("Secret#123")
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    username: String,
    email: String,
    gender: String,
    role: String,
    password: Option<String>,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
    reset_password_token: Option<String>,
    reset_password_expires: Option<DateTime<Utc>>,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - name: `"User {id}"`
    /// - username: `"user{id}"`
    /// - email: `"user{id}@example.com"`
    /// - gender: `"Male"`
    /// - role: `"user"`
    /// - password: unusable hash
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            name: format!("User {}", id),
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            gender: "Male".to_string(),
            role: "user".to_string(),
            password: None,
            created_at: Utc::now(),
            last_login: None,
            reset_password_token: None,
            reset_password_expires: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    /// Sets the role (`"user"`, `"manager"` or `"admin"`).
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Sets a plaintext password, hashed with a low bcrypt cost on build.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn last_login(mut self, last_login: DateTime<Utc>) -> Self {
        self.last_login = Some(last_login);
        self
    }

    /// Sets a pending password reset token with its expiry.
    pub fn reset_token(mut self, token: impl Into<String>, expires: DateTime<Utc>) -> Self {
        self.reset_password_token = Some(token.into());
        self.reset_password_expires = Some(expires);
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert or password hashing
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        let password_hash = match self.password {
            Some(password) => {
                bcrypt::hash(password, 4).map_err(|e| DbErr::Custom(e.to_string()))?
            }
            None => UNUSABLE_HASH.to_string(),
        };

        entity::user::ActiveModel {
            uuid: ActiveValue::Set(new_uuid()),
            name: ActiveValue::Set(self.name),
            username: ActiveValue::Set(self.username),
            email: ActiveValue::Set(self.email),
            gender: ActiveValue::Set(self.gender),
            password_hash: ActiveValue::Set(password_hash),
            role: ActiveValue::Set(self.role),
            avatar: ActiveValue::Set("https://avatar.iran.liara.run/public/1".to_string()),
            reset_password_token: ActiveValue::Set(self.reset_password_token),
            reset_password_expires: ActiveValue::Set(self.reset_password_expires),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
            last_login: ActiveValue::Set(self.last_login),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user with default values.
///
/// Shorthand for `UserFactory::new(db).build().await`.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates a user with the given role.
pub async fn create_user_with_role(
    db: &DatabaseConnection,
    role: &str,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).role(role).build().await
}
