//! User service for business logic.
//!
//! This module provides the `UserService` for accounts: login, registration, profile
//! edits, password resets and the contact form. It applies the input policies and role
//! rules before anything reaches the `UserRepository`.

use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::DatabaseConnection;

use crate::{
    model::user::{Gender, Role},
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, AppError},
        model::{
            page::{PageRequest, Paginated},
            user::{
                CreateUserParams, RegisterParams, UpdateProfileParams, UpdateUserParams, User,
                UserFilter,
            },
        },
        service::{
            auth::{hash_password, verify_password, JwtKeys},
            mail::{ContactMessage, MailTheme, Mailer},
        },
        util::{parse, validate},
    },
};

/// Lifetime of a password reset token.
const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// `mode` value of a reset request that must prove the current password.
const CHANGE_PASSWORD_MODE: &str = "ChangePassword";

/// Result of a password reset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetRequest {
    /// Token handed back to a logged in user editing their own password.
    Token(String),
    /// Reset link sent by email.
    Mailed,
}

/// Raw contact form fields.
#[derive(Debug, Clone, Default)]
pub struct ContactParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub theme: Option<String>,
}

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Checks credentials and issues a token.
    ///
    /// # Arguments
    /// - `username` - Username as sent by the client
    /// - `password` - Plain password
    /// - `jwt` - Keys used to sign the token
    ///
    /// # Returns
    /// - `Ok((User, String))` - The user with refreshed `last_login` and a signed token
    /// - `Err(AppError::BadRequest)` - Username or password missing
    /// - `Err(AuthError::UnknownUsername)` - No account with that username
    /// - `Err(AuthError::WrongPassword)` - Password does not match
    pub async fn login(
        &self,
        username: Option<String>,
        password: Option<String>,
        jwt: &JwtKeys,
    ) -> Result<(User, String), AppError> {
        let username =
            parse::present(username).ok_or_else(|| AppError::bad_request("Username is required"))?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::bad_request("Password is required"))?;

        let repo = UserRepository::new(self.db);
        let credentials = repo
            .find_credentials_by_username(&username)
            .await?
            .ok_or(AuthError::UnknownUsername)?;

        if !verify_password(password, credentials.password_hash).await? {
            return Err(AuthError::WrongPassword.into());
        }

        let user = repo
            .touch_last_login(&credentials.user.id)
            .await?
            .ok_or_else(|| AuthError::UserNotInDatabase(credentials.user.id.clone()))?;
        let token = jwt.issue(&user, Utc::now())?;

        tracing::info!("User {} logged in", user.username);

        Ok((user, token))
    }

    /// Registers an account.
    ///
    /// Rules are checked in order and the first violation is reported: email format and
    /// password policy, username policy, unique username, unique email, role present and
    /// known, role allowed for the caller, gender and name. Admin callers skip the
    /// password policy and are the only ones who may create managers. Nobody creates
    /// admins here.
    ///
    /// # Arguments
    /// - `params` - Registration form
    /// - `caller` - Logged in user sending the form, if any
    ///
    /// # Returns
    /// - `Ok(User)` - The created account
    /// - `Err(AppError::BadRequest)` - A field is missing or invalid
    /// - `Err(AppError::Conflict)` - Username or email already taken
    /// - `Err(AppError::Forbidden)` - Requested role not allowed for the caller
    pub async fn register(
        &self,
        params: RegisterParams,
        caller: Option<&User>,
    ) -> Result<User, AppError> {
        let caller_is_admin = caller.is_some_and(User::is_admin);
        let repo = UserRepository::new(self.db);

        let email = params.email.unwrap_or_default();
        let password = params.password.unwrap_or_default();
        if !validate::is_valid_email(&email)
            || password.is_empty()
            || (!caller_is_admin && !validate::is_valid_password(&password))
        {
            return Err(AppError::bad_request("Invalid email or password"));
        }

        let username = params.username.unwrap_or_default();
        validate::check_username(&username).map_err(AppError::bad_request)?;

        if repo.username_taken(&username, None).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if repo.email_taken(&email, None).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let role: Role = parse::variant(
            params.role.map(|r| r.to_lowercase()),
            "Invalid role",
        )?
        .ok_or_else(|| AppError::bad_request("Role is required"))?;
        if role == Role::Admin || (role == Role::Manager && !caller_is_admin) {
            return Err(AppError::forbidden("Unauthorized action"));
        }

        let gender: Gender = parse::variant(params.gender, "Invalid gender")?
            .ok_or_else(|| AppError::bad_request("Gender is required"))?;
        let name = params
            .name
            .ok_or_else(|| AppError::bad_request("Name is required"))?;

        let user = repo
            .create(CreateUserParams {
                name,
                username,
                email,
                gender,
                password_hash: hash_password(password).await?,
                role,
                avatar: random_avatar(gender),
            })
            .await?;

        tracing::info!("Registered {} account {}", user.role, user.username);

        Ok(user)
    }

    /// Gets a user by external id.
    pub async fn get(&self, id: &str) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_uuid(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Gets a page of users, optionally filtered by search text and role.
    pub async fn list(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>, AppError> {
        UserRepository::new(self.db).get_paginated(&filter, page).await
    }

    /// Edits a profile and issues a fresh token for the edited account.
    ///
    /// Only the owner or an admin may edit. A role change is applied only when an admin
    /// sends it and the new role is not admin; otherwise it is ignored.
    ///
    /// # Returns
    /// - `Ok((User, String))` - Updated user and a token carrying the new profile
    /// - `Err(AppError::Forbidden)` - Caller is neither the owner nor an admin
    /// - `Err(AppError::NotFound)` - No user with that id
    /// - `Err(AppError::Conflict)` - Username or email belongs to another account
    /// - `Err(AppError::BadRequest)` - A field fails validation
    pub async fn update(
        &self,
        id: &str,
        params: UpdateProfileParams,
        caller: &User,
        jwt: &JwtKeys,
    ) -> Result<(User, String), AppError> {
        if caller.id != id && !caller.is_admin() {
            return Err(AppError::forbidden("Unauthorized access"));
        }

        let repo = UserRepository::new(self.db);
        if repo.find_by_uuid(id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        if let Some(username) = &params.username {
            validate::check_username(username).map_err(AppError::bad_request)?;
            if repo.username_taken(username, Some(id)).await? {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
        }
        if let Some(email) = &params.email {
            if !validate::is_valid_email(email) {
                return Err(AppError::bad_request("Invalid email"));
            }
            if repo.email_taken(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let password_hash = match params.password {
            Some(password) => {
                if !validate::is_valid_password(&password) {
                    return Err(AppError::bad_request("Invalid password"));
                }
                Some(hash_password(password).await?)
            }
            None => None,
        };

        let role = if caller.is_admin() {
            parse::variant::<Role>(params.role.map(|r| r.to_lowercase()), "Invalid role")?
                .filter(|role| *role != Role::Admin)
        } else {
            None
        };

        let user = repo
            .update(
                id,
                UpdateUserParams {
                    name: params.name,
                    username: params.username,
                    email: params.email,
                    gender: parse::variant(params.gender, "Invalid gender")?,
                    avatar: params.avatar,
                    password_hash,
                    role,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let token = jwt.issue(&user, Utc::now())?;

        Ok((user, token))
    }

    /// Deletes an account and everything it owns.
    ///
    /// # Returns
    /// - `Ok(User)` - The deleted user
    /// - `Err(AppError::NotFound)` - No user with that id
    pub async fn delete(&self, id: &str) -> Result<User, AppError> {
        let user = UserRepository::new(self.db)
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        tracing::info!("Deleted user {}", user.username);

        Ok(user)
    }

    /// Starts a password reset for the account owning `email`.
    ///
    /// A fresh token valid for ten minutes replaces any earlier one. With a logged in
    /// `caller` the token is returned instead of being mailed. Only the account owner or
    /// an admin may receive a token this way.
    ///
    /// # Arguments
    /// - `email` - Address of the account
    /// - `caller` - Logged in user changing a password in the app
    /// - `theme` - Colour scheme of the email
    /// - `mailer` - Outgoing mail
    ///
    /// # Returns
    /// - `Ok(ResetRequest)` - Token for the caller, or the link was mailed
    /// - `Err(AppError::NotFound)` - No account with that address
    /// - `Err(AppError::Forbidden)` - In-app request for someone else's account
    pub async fn request_password_reset(
        &self,
        email: Option<String>,
        caller: Option<&User>,
        theme: MailTheme,
        mailer: &Mailer,
    ) -> Result<ResetRequest, AppError> {
        let email = parse::present(email).ok_or_else(|| AppError::bad_request("Email is required"))?;

        let repo = UserRepository::new(self.db);
        let user = repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Some(caller) = caller {
            if caller.id != user.id && caller.role != Role::Admin {
                return Err(AppError::forbidden("You can only change your own password"));
            }
        }

        let token = reset_token();
        repo.set_reset_token(
            &user.id,
            &token,
            Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        )
        .await?;

        if caller.is_some() {
            return Ok(ResetRequest::Token(token));
        }

        mailer
            .send_password_reset(&user.email, &token, theme)
            .await?;

        Ok(ResetRequest::Mailed)
    }

    /// Checks that a reset token exists and has not expired.
    ///
    /// # Returns
    /// - `Ok(())` - Token usable
    /// - `Err(AppError::BadRequest)` - Token missing, unknown or expired
    pub async fn verify_reset_token(&self, token: &str) -> Result<(), AppError> {
        let Some(token) = parse::present(Some(token.to_string())) else {
            return Err(AppError::bad_request("Password reset token is required"));
        };

        let reset = UserRepository::new(self.db)
            .find_by_reset_token(&token)
            .await?
            .ok_or_else(|| AppError::bad_request("Password reset token is invalid"))?;

        if reset.is_expired(Utc::now()) {
            return Err(AppError::bad_request("Password reset token has expired"));
        }

        Ok(())
    }

    /// Sets a new password using a reset token.
    ///
    /// In change password mode the current password must be supplied and correct.
    ///
    /// # Returns
    /// - `Ok(())` - Password replaced and token cleared
    /// - `Err(AppError::BadRequest)` - Token invalid or expired, old password wrong, or
    ///   new password violates the policy
    pub async fn reset_password(
        &self,
        token: &str,
        password: Option<String>,
        old_password: Option<String>,
        mode: Option<String>,
    ) -> Result<(), AppError> {
        let repo = UserRepository::new(self.db);
        let reset = match repo.find_by_reset_token(token).await? {
            Some(reset) if !reset.is_expired(Utc::now()) => reset,
            _ => {
                return Err(AppError::bad_request(
                    "Password reset token is invalid or has expired",
                ))
            }
        };

        if mode.as_deref() == Some(CHANGE_PASSWORD_MODE) {
            let old_password = old_password.unwrap_or_default();
            if !verify_password(old_password, reset.password_hash.clone()).await? {
                return Err(AppError::bad_request("Invalid old password provided"));
            }
        }

        let password = password.unwrap_or_default();
        if !validate::is_valid_password(&password) {
            return Err(AppError::bad_request("Invalid password"));
        }

        repo.reset_password(&reset.user.id, hash_password(password).await?)
            .await?;

        tracing::info!("Password reset for {}", reset.user.username);

        Ok(())
    }

    /// Validates a contact form submission and mails it.
    ///
    /// # Returns
    /// - `Ok(())` - Message forwarded and acknowledged
    /// - `Err(AppError::BadRequest)` - A field is missing, the address is invalid or the
    ///   message looks like an injection attempt
    pub async fn contact(&self, params: ContactParams, mailer: &Mailer) -> Result<(), AppError> {
        let (Some(name), Some(email), Some(message)) = (
            parse::present(params.name),
            parse::present(params.email),
            parse::present(params.message),
        ) else {
            return Err(AppError::bad_request("All fields are required"));
        };

        if validate::is_injection_attempt(&message) {
            return Err(AppError::bad_request("Suspicious input detected!"));
        }
        if !validate::is_valid_email(&email) {
            return Err(AppError::bad_request("Invalid email"));
        }

        mailer
            .send_contact(&ContactMessage {
                name: validate::strip_html(&name),
                email,
                message: validate::strip_html(&message),
                theme: MailTheme::from_request(params.theme.as_deref()),
            })
            .await
    }
}

/// Picks a random avatar from the gendered half of the avatar set.
pub fn random_avatar(gender: Gender) -> String {
    let range = match gender {
        Gender::Male => 1..=50,
        Gender::Female => 51..=100,
    };
    let n: u32 = rand::rng().random_range(range);

    format!("https://avatar.iran.liara.run/public/{}", n)
}

/// 32 random bytes as lowercase hex.
fn reset_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();

    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
