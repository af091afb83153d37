//! Authentication: password hashing, bearer tokens, and identity extraction.
//!
//! Tokens are stateless signed JWTs carrying the user id and role, so
//! verification needs no session store. The subject is still re-fetched on
//! each request, which invalidates tokens of users deleted since issuance.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use crate::db::{LoginRequest, LoginResponse, Role, User, UserResponse};
use crate::AppState;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Bearer token claims: subject (user id), role, issue and expiry times.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a token for a user, valid for the given lifetime.
pub fn issue_token(
    user: &User,
    secret: &str,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token's signature and expiry, returning its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::invalid_token("Invalid or expired token"))
}

/// Explicit capability check. Admins satisfy every requirement; a plain
/// user requirement is satisfied by any authenticated identity.
pub fn require_role(user: &User, required: Role) -> Result<(), ApiError> {
    match required {
        Role::Admin if !user.is_admin() => Err(ApiError::forbidden("Admin access required")),
        _ => Ok(()),
    }
}

/// Login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if request.username.as_deref().unwrap_or("").is_empty() {
        errors.add("username", "Username is required");
    }
    if request.password.as_deref().unwrap_or("").is_empty() {
        errors.add("password", "Password is required");
    }
    errors.finish()?;

    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(&username)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| ApiError::invalid_credentials("Invalid credentials"))?;

    if !verify_password(&password, &user.password_hash) {
        return Err(ApiError::invalid_credentials("Invalid credentials"));
    }

    let token = issue_token(
        &user,
        &state.config.auth.jwt_secret,
        chrono::Duration::hours(state.config.auth.token_ttl_hours),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Identity of the authenticated caller
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
}

/// Profile endpoint
pub async fn profile(user: User) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        id: user.id,
        username: user.username,
        role: user.role,
    })
}

/// Extract the bearer token from request headers
fn extract_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Get the current user from a token
pub async fn get_current_user(
    pool: &crate::DbPool,
    secret: &str,
    token: &str,
) -> Result<User, ApiError> {
    let claims = verify_token(token, secret)?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&claims.sub)
        .fetch_optional(pool)
        .await?;

    user.ok_or_else(|| ApiError::invalid_token("Invalid or expired token"))
}

/// Extractor for getting the current authenticated user from a request
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::invalid_token("Authorization token required"))?;
        get_current_user(&state.db, &state.config.auth.jwt_secret, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorCode;

    fn test_user(role: Role) -> User {
        User {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            username: "alice".to_string(),
            password_hash: String::new(),
            role,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }

    #[test]
    fn test_token_round_trip() {
        let user = test_user(Role::User);
        let token = issue_token(&user, "secret", chrono::Duration::hours(1)).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = test_user(Role::User);
        let token = issue_token(&user, "secret", chrono::Duration::hours(-2)).unwrap();
        let err = verify_token(&token, "secret").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidToken);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user = test_user(Role::Admin);
        let token = issue_token(&user, "secret", chrono::Duration::hours(1)).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(verify_token("not.a.token", "secret").is_err());
        assert!(verify_token("", "secret").is_err());
    }

    #[test]
    fn test_require_role() {
        let admin = test_user(Role::Admin);
        let user = test_user(Role::User);

        assert!(require_role(&admin, Role::Admin).is_ok());
        assert!(require_role(&admin, Role::User).is_ok());
        assert!(require_role(&user, Role::User).is_ok());

        let err = require_role(&user, Role::Admin).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
