use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        let username = self.username.trim();
        if username.len() < 3 {
            return Err("Username must be at least 3 characters".into());
        }
        if self.password.len() < 6 {
            return Err("Password must be at least 6 characters".into());
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            if !email.contains('@') {
                return Err("Invalid email address".into());
            }
        }
        Ok(())
    }
}

/// Body returned by login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
