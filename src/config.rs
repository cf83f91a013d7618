use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SESSION_TTL_HOURS: u64 = 24 * 7;

/// Google OAuth client settings. Sign-in with Google is disabled unless the
/// client id and secret are both set.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl GoogleConfig {
    pub const AUTH_URL: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";
    pub const TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";
    pub const USERINFO_URL: &'static str = "https://www.googleapis.com/oauth2/v3/userinfo";

    fn from_env(default_redirect: String) -> Option<Self> {
        let client_id = env::var("GOOGLE_CLIENT_ID").ok().filter(|v| !v.is_empty())?;
        let client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .ok()
            .filter(|v| !v.is_empty())?;

        Some(Self {
            client_id,
            client_secret,
            redirect_uri: env::var("GOOGLE_REDIRECT_URI").unwrap_or(default_redirect),
            auth_url: Self::AUTH_URL.into(),
            token_url: Self::TOKEN_URL.into(),
            userinfo_url: Self::USERINFO_URL.into(),
        })
    }
}

/// Language model backends the assistant can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Ollama,
    Anthropic,
}

impl AiProvider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Ollama => "http://localhost:11434",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Ollama => "llama3.2",
            Self::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl FromStr for AiProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(()),
        }
    }
}

/// Settings for the financial assistant. The assistant endpoints answer 404
/// unless `CASHFLOW_AI_PROVIDER` names a provider (and, except for Ollama, an
/// API key is set).
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    fn from_env() -> Option<Self> {
        let provider: AiProvider = env::var("CASHFLOW_AI_PROVIDER").ok()?.parse().ok()?;
        let api_key = env::var("CASHFLOW_AI_API_KEY").unwrap_or_default();
        if provider.requires_api_key() && api_key.is_empty() {
            tracing::warn!("CASHFLOW_AI_API_KEY not set, AI assistant disabled");
            return None;
        }

        Some(Self {
            provider,
            base_url: env::var("CASHFLOW_AI_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| provider.default_base_url().into()),
            api_key,
            model: env::var("CASHFLOW_AI_MODEL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| provider.default_model().into()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    /// Origin of the browser client; Google sign-in redirects back here.
    pub client_url: String,
    pub google: Option<GoogleConfig>,
    pub ai: Option<AiConfig>,
    /// How long a session token stays valid after it is issued.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("CASHFLOW_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env::var("CASHFLOW_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(7070);
        let client_url = env::var("CASHFLOW_CLIENT_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let google = GoogleConfig::from_env(format!("{}/api/auth/google/callback", client_url));
        if google.is_none() {
            tracing::info!("GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET not set, Google sign-in disabled");
        }

        let ai = AiConfig::from_env();
        if ai.is_none() {
            tracing::info!("AI assistant not configured");
        }

        let session_ttl_hours = env::var("CASHFLOW_SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);

        Self {
            host,
            port,
            database_path: env::var("CASHFLOW_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/cashflow.db")),
            migrations_path: env::var("CASHFLOW_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            client_url,
            google,
            ai,
            session_ttl: Duration::from_secs(session_ttl_hours * 3600),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
