//! Sign-in with Google.
//!
//! `GET /api/auth/google` sends the browser to Google's consent screen. Google
//! redirects back to `/api/auth/google/callback?code=...`; the code is
//! exchanged for an access token, the profile is fetched, the user holding
//! that Google account is found or created, and the browser is sent to the
//! client's callback page with a fresh session token in the `token` query
//! parameter. The client then resolves the user through `GET /api/users/me`
//! like any other login.

use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::db::queries::{
    self,
    users::{self, GoogleProfile},
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const SCOPES: &str = "openid email profile";

/// Client route that finishes the sign-in.
pub const CLIENT_CALLBACK_PATH: &str = "/auth/google/callback";
/// Client route shown when sign-in fails.
pub const CLIENT_AUTH_PATH: &str = "/auth";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

fn google_config(state: &AppState) -> AppResult<&GoogleConfig> {
    state
        .config
        .google
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Google sign-in is not configured".into()))
}

/// Build the consent screen URL.
pub fn consent_url(google: &GoogleConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&prompt=select_account",
        google.auth_url,
        urlencoding::encode(&google.client_id),
        urlencoding::encode(&google.redirect_uri),
        urlencoding::encode(SCOPES),
    )
}

/// Where the browser goes once a session token has been issued.
pub fn client_callback_url(client_url: &str, token: &str) -> String {
    format!(
        "{}{}?token={}",
        client_url,
        CLIENT_CALLBACK_PATH,
        urlencoding::encode(token)
    )
}

fn failure_redirect(client_url: &str, reason: &str) -> Redirect {
    Redirect::to(&format!(
        "{}{}?error={}",
        client_url,
        CLIENT_AUTH_PATH,
        urlencoding::encode(reason)
    ))
}

pub async fn google_start(State(state): State<AppState>) -> AppResult<Redirect> {
    let google = google_config(&state)?;
    Ok(Redirect::to(&consent_url(google)))
}

pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> AppResult<Redirect> {
    let google = google_config(&state)?;
    let client_url = &state.config.client_url;

    if let Some(error) = params.error {
        tracing::info!(error = %error, "Google sign-in was not completed");
        return Ok(failure_redirect(client_url, &error));
    }
    let Some(code) = params.code else {
        return Ok(failure_redirect(client_url, "missing_code"));
    };

    let profile = match exchange_code(&state.http, google, &code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Google code exchange failed: {}", e);
            return Ok(failure_redirect(client_url, "google_failed"));
        }
    };

    let user = {
        let conn = state.db.get()?;
        users::upsert_google_user(&conn, &profile).map_err(|e| {
            if queries::is_constraint_violation(&e) {
                AppError::Conflict("Username for this Google account is already taken".into())
            } else {
                e.into()
            }
        })?
    };
    let token = state.sessions.create(user.id);
    tracing::info!(user_id = user.id, "Signed in with Google");

    Ok(Redirect::to(&client_callback_url(client_url, &token)))
}

async fn exchange_code(
    http: &reqwest::Client,
    google: &GoogleConfig,
    code: &str,
) -> AppResult<GoogleProfile> {
    let token: TokenResponse = http
        .post(&google.token_url)
        .form(&[
            ("code", code),
            ("client_id", google.client_id.as_str()),
            ("client_secret", google.client_secret.as_str()),
            ("redirect_uri", google.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::Upstream(format!("Token request failed: {}", e)))?
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Invalid token response: {}", e)))?;

    let info: UserInfo = http
        .get(&google.userinfo_url)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::Upstream(format!("Userinfo request failed: {}", e)))?
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Invalid userinfo response: {}", e)))?;

    Ok(GoogleProfile {
        google_id: info.sub,
        email: info.email,
        name: info.name,
        picture: info.picture,
    })
}
