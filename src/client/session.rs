use reqwest::Url;

use super::api::ApiClient;
use super::error::{ClientError, ClientResult};
use super::token::TokenStore;
use crate::models::User;

/// The signed-in identity: current user and token, persisted through a
/// [`TokenStore`] so a restarted client can pick the session back up.
///
/// A token the server rejects is treated as a logout: it is removed from
/// storage and the user is cleared.
pub struct Session {
    api: ApiClient,
    tokens: TokenStore,
    user: Option<User>,
    token: Option<String>,
}

impl Session {
    pub fn new(api: ApiClient, tokens: TokenStore) -> Self {
        Self {
            api: api.anonymous(),
            tokens,
            user: None,
            token: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// An API client carrying the session token.
    pub fn api(&self) -> ClientResult<ApiClient> {
        match &self.token {
            Some(token) => Ok(self.api.with_token(token)),
            None => Err(ClientError::Unauthenticated),
        }
    }

    /// Resume from a stored token, if any. Returns the user when the token is
    /// still accepted.
    pub async fn restore(&mut self) -> ClientResult<Option<&User>> {
        let Some(token) = self.tokens.token()? else {
            return Ok(None);
        };
        if let Err(e) = self.accept_token(&token).await {
            return if e.is_unauthorized() { Ok(None) } else { Err(e) };
        }
        Ok(self.user.as_ref())
    }

    /// Store `token` and resolve the user it belongs to.
    pub async fn accept_token(&mut self, token: &str) -> ClientResult<&User> {
        self.tokens.set_token(token)?;

        match self.api.with_token(token).me().await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Signed in as {}", user.username);
                self.token = Some(token.to_string());
                Ok(&*self.user.insert(user))
            }
            Err(e) => {
                tracing::error!("Failed to get user data: {}", e);
                self.clear()?;
                Err(e)
            }
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<&User> {
        let auth = self.api.login(username, password).await?;
        self.accept_token(&auth.token).await
    }

    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> ClientResult<&User> {
        let auth = self.api.register(username, password, email).await?;
        self.accept_token(&auth.token).await
    }

    /// Finish a Google sign-in from the URL the server redirected to, e.g.
    /// `http://localhost:5173/auth/google/callback?token=...`.
    pub async fn complete_google_sign_in(&mut self, callback_url: &str) -> ClientResult<&User> {
        let url = Url::parse(callback_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", callback_url, e)))?;

        let mut token = None;
        for (key, value) in url.query_pairs() {
            match &*key {
                "token" if !value.is_empty() => token = Some(value.into_owned()),
                "error" => tracing::warn!(error = %value, "Google sign-in failed"),
                _ => {}
            }
        }

        let token = token.ok_or(ClientError::MissingToken)?;
        self.accept_token(&token).await
    }

    /// Forget the session locally and ask the server to revoke the token.
    /// Revocation is best effort.
    pub async fn logout(&mut self) -> ClientResult<()> {
        if let Ok(api) = self.api() {
            if let Err(e) = api.logout().await {
                tracing::warn!("Failed to revoke session: {}", e);
            }
        }
        self.clear()
    }

    fn clear(&mut self) -> ClientResult<()> {
        self.user = None;
        self.token = None;
        self.tokens.clear_token()
    }
}
