use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sha2::{Digest, Sha256};
use tracing::info;

use storyteller_types::api::{LoginRequest, RegisterRequest};
use storyteller_types::models::User;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::{AppState, blocking};

const SALT_BYTES: usize = 16;
const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 100;
const MIN_PASSWORD_LEN: usize = 8;

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_registration(&req)?;

    let password_hash = hash_password(&req.password);

    let db = state.db.clone();
    let user = blocking(move || db.create_user(&req.username, &req.email, &password_hash)).await?;

    info!("Registered user {} ({})", user.id, user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let db = state.db.clone();
    let email = req.email.clone();
    let row = blocking(move || db.get_user_by_email(&email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &row.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let user = User::try_from(row)?;
    Ok(Json(user))
}

// -- Password digests --

/// Salt and digest a password. Returns `"salt:digest"`, both hex-encoded,
/// where digest = SHA-256(password || salt).
pub fn hash_password(password: &str) -> String {
    let salt = hex::encode(rand::random::<[u8; SALT_BYTES]>());
    let digest = salted_digest(password, &salt);
    format!("{}:{}", salt, digest)
}

/// Re-digest `password` with the salt split from `stored` and compare.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once(':') {
        Some((salt, expected)) => salted_digest(password, salt) == expected,
        None => false,
    }
}

fn salted_digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

// -- Validation --

fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    let username_len = req.username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username_len) {
        return Err(ApiError::Validation(format!(
            "Username must be between {} and {} characters",
            MIN_USERNAME_LEN, MAX_USERNAME_LEN
        )));
    }

    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }

    validate_password(&req.password)
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }
    Ok(())
}

/// Structural check only: one `@`, a non-empty local part and a dotted domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
