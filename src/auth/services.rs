use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, Profile, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::NewUser,
    },
    error::{AppError, AppResult},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<Uuid> {
    let email = normalize_email(&req.email);
    let username = req.username.trim().to_string();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("Password too short".into()));
    }

    if state
        .users
        .find_by_email(&email)
        .await
        .map_err(AppError::Storage)?
        .is_some()
    {
        warn!(email = %email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let password_hash =
        hash_password(&req.password, &state.config.password).map_err(AppError::Internal)?;

    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(AppError::Storage)?
        .ok_or(AppError::DuplicateEmail)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user.id)
}

pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<String> {
    let email = normalize_email(&req.email);

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(AppError::Storage)?
        .ok_or_else(|| {
            warn!(email = %email, "login unknown email");
            AppError::UserNotFound
        })?;

    let ok = verify_password(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = JwtKeys::from(&state.config.jwt)
        .sign(user.id)
        .map_err(AppError::Internal)?;

    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

pub async fn fetch_profile(state: &AppState, user_id: Uuid) -> AppResult<Profile> {
    state
        .users
        .find_by_id(user_id)
        .await
        .map_err(AppError::Storage)?
        .map(Profile::from)
        .ok_or(AppError::NotFound("User not found"))
}
