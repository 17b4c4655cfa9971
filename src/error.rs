// Error types for the humany client.
// Transport and decode errors pass through from reqwest and serde_json.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HumanyError {
    #[error("Humany API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid service URL '{0}': expected an absolute http(s) URL")]
    InvalidServiceUrl(String),

    #[error("Missing HUMANY_SERVICE_URL environment variable")]
    MissingServiceUrl,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type Result<T> = std::result::Result<T, HumanyError>;
