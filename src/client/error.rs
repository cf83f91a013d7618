use thiserror::Error;

use crate::models::Collection;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Not signed in")]
    Unauthenticated,

    #[error("No token received from Google auth")]
    MissingToken,

    #[error("Invalid callback URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load {collection}: {source}")]
    Load {
        collection: Collection,
        #[source]
        source: Box<ClientError>,
    },

    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Token storage is corrupt: {0}")]
    StorageFormat(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the server rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            ClientError::Unauthenticated => true,
            ClientError::Status { status, .. } => *status == 401,
            _ => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
