//! Authenticated user identity
//!
//! Accounts live in the platform's identity service; the marketplace only
//! trusts the bearer token it issues, signed with the shared secret.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Platform role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Admin,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Claims for a user, valid for `hours`
    pub fn new(user_id: i32, login: impl Into<String>, role: Role, hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: login.into(),
            user_id,
            role,
            exp: (now + Duration::hours(hours)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// Owner of a resource, or an admin
    pub fn can_manage(&self, owner_id: i32) -> bool {
        self.user_id == owner_id || self.is_admin()
    }

    pub fn require_owner(&self, owner_id: i32, what: &str) -> Result<(), AppError> {
        if self.can_manage(owner_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("Only the owner can modify this {}", what)))
        }
    }
}
