use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::header, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};

use tchouk_store::Store;
use tchouk_types::api::{Claims, LoginRequest, StatusMessage};
use tchouk_types::models::UserRecord;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
    pub jwt_secret: String,
}

pub const AUTH_COOKIE: &str = "auth_token";

const TOKEN_TTL_DAYS: i64 = 7;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const BAD_CREDENTIALS: ApiError = ApiError::Unauthorized("Invalid username or password");

    let user = state
        .store
        .find_by_name::<UserRecord>(&req.username)
        .map_err(|_| BAD_CREDENTIALS)?;

    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| BAD_CREDENTIALS)?;

    let token = issue_token(&state.jwt_secret, &user.username)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let cookie = format!(
        "{AUTH_COOKIE}={token}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        TOKEN_TTL_DAYS * 24 * 60 * 60
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(StatusMessage {
            code: 200,
            message: format!("Logged in as: {}", user.username),
        }),
    ))
}

/// Sign an HS256 token for `username`, valid for seven days.
pub fn issue_token(secret: &str, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Argon2id hash for provisioning user records (administrative seeding and
/// tests; there is no registration route).
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e))?
        .to_string())
}
