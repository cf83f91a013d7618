use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ClientError, ClientResult};
use crate::models::{
    AssistRequest, AssistResponse, AuthResponse, ChatRequest, ChatResponse, Collection,
    FinancialSnapshot, LoginRequest, Record, RegisterRequest, User,
};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BASE_URL: &str = "http://localhost:7070";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the cashflow API. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the server at `base_url` (scheme, host and port).
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a client from `CASHFLOW_API_URL`, falling back to localhost.
    pub fn from_env() -> ClientResult<Self> {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("CASHFLOW_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    /// A copy of this client that authenticates with `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    /// A copy of this client without credentials.
    pub fn anonymous(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn non-success responses into [`ClientError::Status`], using the
    /// server's `{"error": ...}` message when there is one.
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("API error: {}", status.as_u16()),
        };
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    // =========================================================================
    // Records
    // =========================================================================

    fn collection_path(collection: Collection) -> String {
        format!("/api/{}", collection.path())
    }

    fn record_path(collection: Collection, id: &str) -> String {
        format!("/api/{}/{}", collection.path(), urlencoding::encode(id))
    }

    pub async fn list<T: DeserializeOwned>(&self, collection: Collection) -> ClientResult<Vec<T>> {
        self.get(&Self::collection_path(collection)).await
    }

    pub async fn create(&self, record: &Record) -> ClientResult<()> {
        let _: serde_json::Value = self
            .post(&Self::collection_path(record.collection()), record)
            .await?;
        Ok(())
    }

    pub async fn update(&self, record: &Record) -> ClientResult<()> {
        let _: serde_json::Value = self
            .put(&Self::record_path(record.collection(), record.id()), record)
            .await?;
        Ok(())
    }

    pub async fn remove(&self, collection: Collection, id: &str) -> ClientResult<()> {
        self.delete(&Self::record_path(collection, id)).await
    }

    // =========================================================================
    // Assistant
    // =========================================================================

    /// Ask for advice on `data`, typically the client's current collections.
    pub async fn assist(&self, query: &str, data: &FinancialSnapshot) -> ClientResult<String> {
        let body = AssistRequest {
            query: query.into(),
            user_data: Some(data.clone()),
        };
        let reply: AssistResponse = self.post("/api/ai/assist", &body).await?;
        Ok(reply.advice)
    }

    pub async fn chat(&self, message: &str) -> ClientResult<String> {
        let body = ChatRequest {
            message: message.into(),
        };
        let reply: ChatResponse = self.post("/api/ai/chat", &body).await?;
        Ok(reply.response)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        self.post("/api/auth/login", &body).await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> ClientResult<AuthResponse> {
        let body = RegisterRequest {
            username: username.into(),
            password: password.into(),
            email: email.map(str::to_string),
        };
        self.post("/api/auth/register", &body).await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        let response = self.request(Method::POST, "/api/auth/logout").send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn me(&self) -> ClientResult<User> {
        if self.token.is_none() {
            return Err(ClientError::Unauthenticated);
        }
        self.get("/api/users/me").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let api = ApiClient::new("http://localhost:7070/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:7070");
    }

    #[test]
    fn test_with_token_and_anonymous() {
        let api = ApiClient::new("http://localhost:7070").unwrap();
        assert_eq!(api.token(), None);

        let authed = api.with_token("abc");
        assert_eq!(authed.token(), Some("abc"));
        assert_eq!(authed.anonymous().token(), None);
    }

    #[test]
    fn test_record_path_encodes_id() {
        assert_eq!(
            ApiClient::record_path(Collection::Goals, "a b/c"),
            "/api/goals/a%20b%2Fc"
        );
        assert_eq!(
            ApiClient::collection_path(Collection::Liabilities),
            "/api/liabilities"
        );
    }

    #[tokio::test]
    async fn test_me_without_token() {
        let api = ApiClient::new("http://localhost:7070").unwrap();
        let err = api.me().await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
