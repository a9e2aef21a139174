//! User domain models and parameters.
//!
//! Provides the account model shared by authentication, profile management and every
//! listing that embeds a user. Password hashes and reset tokens never leave the data
//! layer through `User`; they are exposed only through the dedicated credential types.

use chrono::{DateTime, Utc};

use crate::{
    model::user::{Gender, MemberStatsDto, RegisterDto, Role, UpdateUserDto, UserDto, UserRefDto},
    server::{error::internal::InternalError, util::parse},
};

/// Account as seen by services and controllers.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// External id.
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub gender: Gender,
    pub role: Role,
    /// Avatar image URL.
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Time of the last successful login, if any.
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Converts an entity model to a user domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(User)` - The converted user domain model
    /// - `Err(InternalError::InvalidStoredValue)` - Stored gender or role is unknown
    pub fn from_entity(entity: entity::user::Model) -> Result<Self, InternalError> {
        Ok(Self {
            id: entity.uuid,
            name: entity.name,
            username: entity.username,
            email: entity.email,
            gender: parse::stored("user.gender", &entity.gender)?,
            role: parse::stored("user.role", &entity.role)?,
            avatar: entity.avatar,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            last_login: entity.last_login,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the user holds at least the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role >= role
    }

    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            name: self.name,
            username: self.username,
            email: self.email,
            gender: self.gender,
            role: self.role,
            avatar: self.avatar,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_login: self.last_login,
        }
    }

    /// Short `{id, name, username}` reference used in project listings.
    pub fn into_ref_dto(self) -> UserRefDto {
        UserRefDto {
            id: self.id,
            name: self.name,
            username: self.username,
        }
    }
}

/// User together with the stored password hash, used for login and password checks.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Pending password reset attached to a user.
#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub user: User,
    pub password_hash: String,
    /// Expiry of the token. A token without expiry is treated as expired.
    pub expires_at: Option<DateTime<Utc>>,
}

impl PasswordReset {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires| expires <= now)
    }
}

/// Parameters for creating an account.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub name: String,
    pub username: String,
    pub email: String,
    pub gender: Gender,
    pub password_hash: String,
    pub role: Role,
    pub avatar: String,
}

/// Parameters for updating an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub avatar: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Registration form with client placeholders removed.
///
/// Fields stay raw strings here: the service checks them in a fixed order so the first
/// violated rule decides the error message.
#[derive(Debug, Clone, Default)]
pub struct RegisterParams {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl RegisterParams {
    pub fn from_dto(dto: RegisterDto) -> Self {
        Self {
            name: parse::present(dto.name),
            gender: parse::present(dto.gender),
            email: parse::present(dto.email),
            username: parse::present(dto.username),
            // Passwords are taken verbatim, surrounding spaces included.
            password: dto.password.filter(|p| !p.is_empty()),
            role: parse::present(dto.role),
        }
    }
}

/// Profile edit with client placeholders removed. Absent fields stay unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub gender: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateProfileParams {
    pub fn from_dto(dto: UpdateUserDto) -> Self {
        Self {
            name: parse::present(dto.name),
            email: parse::present(dto.email),
            username: parse::present(dto.username),
            gender: parse::present(dto.gender),
            avatar: parse::present(dto.avatar),
            password: dto.password.filter(|p| !p.is_empty()),
            role: parse::present(dto.role),
        }
    }
}

/// Filters for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring matched against name, email and username.
    pub search: Option<String>,
    pub role: Option<Role>,
}

/// Team member with counters over the tasks assigned to them.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStats {
    pub user: User,
    pub total_tasks: u64,
    pub completed_tasks: u64,
}

impl MemberStats {
    pub fn into_dto(self) -> MemberStatsDto {
        MemberStatsDto {
            user: self.user.into_dto(),
            total_tasks: self.total_tasks,
            completed_tasks: self.completed_tasks,
        }
    }
}
