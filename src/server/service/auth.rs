//! Token issuing and password hashing.
//!
//! Tokens are HS256 JWTs valid for one hour that carry the public profile of the user.
//! Password hashing runs bcrypt on the blocking thread pool so request handlers never
//! stall the runtime.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::{
    model::user::{Gender, Role},
    server::{
        error::{auth::AuthError, AppError},
        model::user::User,
    },
};

/// Lifetime of an issued token.
const TOKEN_TTL_HOURS: i64 = 1;

/// bcrypt work factor for stored passwords.
const BCRYPT_COST: u32 = 10;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// External id of the user.
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub gender: Gender,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a token for a user, valid for one hour from `now`.
    ///
    /// # Returns
    /// - `Ok(String)` - Encoded token
    /// - `Err(AppError::JwtErr)` - Signing failed
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            gender: user.gender,
            avatar: user.avatar.clone(),
            last_login: user.last_login,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Returns
    /// - `Ok(Claims)` - Token is valid
    /// - `Err(AuthError::SessionExpired)` - Token signature is valid but expired
    /// - `Err(AuthError::InvalidCredentials)` - Token is malformed or forged
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidCredentials,
            })
    }
}

/// Hashes a password with bcrypt on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST)).await??)
}

/// Checks a password against a stored hash. Unusable hashes never match.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false)).await?)
}
