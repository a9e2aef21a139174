use axum::http::{header::AUTHORIZATION, HeaderMap};
use sea_orm::DatabaseConnection;

use crate::{
    model::user::Role,
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, AppError},
        model::user::User,
        service::auth::JwtKeys,
    },
};

/// Role a route requires beyond being logged in.
pub enum Permission {
    /// Manager or admin.
    Manager,
    Admin,
}

/// Resolves the caller of a request from its `Authorization` header.
///
/// The header holds the token either raw or as `Bearer <token>`. The token's user is
/// reloaded from the database so deleted accounts and role changes take effect at once.
pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    jwt: &'a JwtKeys,
    headers: &'a HeaderMap,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, jwt: &'a JwtKeys, headers: &'a HeaderMap) -> Self {
        Self { db, jwt, headers }
    }

    /// Requires a logged in caller holding every listed permission.
    ///
    /// # Arguments
    /// - `permissions` - Required roles; empty means any logged in user
    ///
    /// # Returns
    /// - `Ok(User)` - The caller
    /// - `Err(AuthError::MissingToken)` - No token sent
    /// - `Err(AuthError::SessionExpired)` / `Err(AuthError::InvalidCredentials)` - Bad token
    /// - `Err(AuthError::UserNotInDatabase)` - Token user was deleted
    /// - `Err(AuthError::AccessDenied)` - Caller lacks a permission
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let Some(token) = self.token() else {
            return Err(AuthError::MissingToken.into());
        };

        let user = self.resolve(token).await?;

        for permission in permissions {
            let (role, action) = match permission {
                Permission::Manager => (Role::Manager, "manager"),
                Permission::Admin => (Role::Admin, "admin"),
            };
            if !user.has_role(role) {
                return Err(AuthError::AccessDenied(
                    user.id.clone(),
                    format!("route requires {} role, user has {}", action, user.role),
                )
                .into());
            }
        }

        Ok(user)
    }

    /// Resolves the caller when a token is present.
    ///
    /// Used by routes that behave differently for logged in callers. A token that is
    /// present but invalid is still an error.
    pub async fn optional(&self) -> Result<Option<User>, AppError> {
        match self.token() {
            Some(token) => Ok(Some(self.resolve(token).await?)),
            None => Ok(None),
        }
    }

    fn token(&self) -> Option<&'a str> {
        let value = self.headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

        (!token.is_empty()).then_some(token)
    }

    async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let claims = self.jwt.verify(token)?;

        UserRepository::new(self.db)
            .find_by_uuid(&claims.id)
            .await?
            .ok_or_else(|| AuthError::UserNotInDatabase(claims.id).into())
    }
}
