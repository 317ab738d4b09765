use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        avatar::gravatar_url,
        dto::{LoginRequest, RegisterRequest, TokenResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::{ApiError, FieldError},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth", post(login).get(current_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "A valid email is required"));
    }
    if payload.password.chars().count() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateUser);
    }

    let avatar_url = gravatar_url(&payload.email);

    // Argon2 is deliberately slow; keep it off the async executor.
    let password = payload.password.clone();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    // The unique index on email closes the find/create race: a concurrent
    // insert surfaces here as DuplicateUser via the sqlx conversion.
    let user = User::create(
        &state.db,
        payload.name.trim(),
        &payload.email,
        &hash,
        &avatar_url,
    )
    .await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let mut errors = Vec::new();
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "A valid email is required"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Unknown email and wrong password produce the same error so the
    // response does not reveal which accounts exist.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login with unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let password = payload.password.clone();
    let stored_hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    if !ok {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_matches_plausible_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.io"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[tokio::test]
    async fn register_reports_every_invalid_field() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            name: "  ".into(),
            email: "nope".into(),
            password: "short".into(),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["name", "email", "password"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_rejects_malformed_email_before_touching_the_store() {
        let state = AppState::fake();
        let payload = LoginRequest {
            email: "not-an-email".into(),
            password: "hunter2".into(),
        };
        let err = login(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
