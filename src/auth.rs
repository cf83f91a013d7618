//! Bearer-token authentication.
//!
//! Users register with a username and password (stored as an Argon2 hash) or
//! sign in through Google (see [`crate::oauth`]). Either way they receive a
//! random session token which the client sends as `Authorization: Bearer`.
//! Tokens live in the in-memory [`SessionStore`](crate::state::SessionStore)
//! and are invalidated on logout or server restart.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;

use crate::db::queries::{self, users};
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::state::AppState;

/// Routes reachable without a session.
const PUBLIC_PATHS: &[&str] = &[
    "/health",
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/google",
    "/api/auth/google/callback",
];

/// The authenticated caller, inserted by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub token: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Reject `/api` requests without a valid session token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if PUBLIC_PATHS.contains(&path) || !path.starts_with("/api/") {
        return next.run(request).await;
    }

    let user = bearer_token(request.headers()).and_then(|token| {
        state.sessions.user_id(token).map(|id| CurrentUser {
            id,
            token: token.to_string(),
        })
    });

    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => AppError::Unauthorized("Authentication required".into()).into_response(),
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    body.validate().map_err(AppError::Validation)?;

    let username = body.username.trim();
    let email = body.email.as_deref().filter(|e| !e.is_empty());
    let conn = state.db.get()?;

    if users::find_by_username(&conn, username)?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let hash = hash_password(&body.password)?;
    let id = insert_user(&conn, username, email, &hash)?;
    let user = users::get_user(&conn, id)?
        .ok_or_else(|| AppError::Internal("Registered user vanished".into()))?;

    let token = state.sessions.create(user.id);
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Insert a password account. A concurrent registration can still take the
/// name between the existence check and this insert.
fn insert_user(
    conn: &rusqlite::Connection,
    username: &str,
    email: Option<&str>,
    hash: &str,
) -> AppResult<i64> {
    users::create_user(conn, username, email, hash).map_err(|e| {
        if queries::is_constraint_violation(&e) {
            AppError::Conflict("Username already exists".into())
        } else {
            e.into()
        }
    })
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let conn = state.db.get()?;
    let username = body.username.trim();

    let verified = users::password_hash(&conn, username)?
        .is_some_and(|hash| verify_password(&body.password, &hash));
    if !verified {
        tracing::info!(username = %username, "Failed login attempt");
        return Err(AppError::Unauthorized("Invalid username or password".into()));
    }

    let user = users::find_by_username(&conn, username)?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".into()))?;
    let token = state.sessions.create(user.id);
    Ok(Json(AuthResponse { token, user }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> StatusCode {
    state.sessions.revoke(&current.token);
    StatusCode::NO_CONTENT
}

/// `GET /api/users/me`
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<User>> {
    let conn = state.db.get()?;
    let user = users::get_user(&conn, current.id)?.ok_or_else(|| {
        state.sessions.revoke(&current.token);
        AppError::Unauthorized("User no longer exists".into())
    })?;
    Ok(Json(user))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against an Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::error!("Invalid password hash format in users table");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn test_insert_user_maps_duplicate_to_conflict() {
        let pool = crate::db::create_in_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        crate::db::migrations::run_migrations(&conn, std::path::Path::new("migrations")).unwrap();

        insert_user(&conn, "alice", None, "$argon2id$a").unwrap();
        let err = insert_user(&conn, "alice", None, "$argon2id$b").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
