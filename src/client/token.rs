use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::ClientResult;

/// Key the session token is stored under.
pub const AUTH_TOKEN_KEY: &str = "authToken";

const DEFAULT_TOKEN_FILE: &str = "data/client-storage.json";

/// Durable key/value storage for the session token, kept as a small JSON
/// object on disk so a restarted client can restore its session.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at `CASHFLOW_TOKEN_FILE`, or `data/client-storage.json`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let path =
            std::env::var("CASHFLOW_TOKEN_FILE").unwrap_or_else(|_| DEFAULT_TOKEN_FILE.into());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> ClientResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }

    pub fn token(&self) -> ClientResult<Option<String>> {
        Ok(self.read()?.remove(AUTH_TOKEN_KEY))
    }

    pub fn set_token(&self, token: &str) -> ClientResult<()> {
        let mut entries = self.read()?;
        entries.insert(AUTH_TOKEN_KEY.to_string(), token.to_string());
        self.write(&entries)
    }

    pub fn clear_token(&self) -> ClientResult<()> {
        let mut entries = self.read()?;
        if entries.remove(AUTH_TOKEN_KEY).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}
