// Client configuration.
// Service URL, default parameters and the statistics switch, optionally read from the environment.

use reqwest::Url;

use crate::error::{HumanyError, Result};

pub const SERVICE_URL_VAR: &str = "HUMANY_SERVICE_URL";
pub const CLIENT_VAR: &str = "HUMANY_CLIENT";
pub const LANGUAGE_VAR: &str = "HUMANY_LANGUAGE";
pub const SITE_VAR: &str = "HUMANY_SITE";
pub const FUNNEL_VAR: &str = "HUMANY_FUNNEL";
pub const STATISTICS_VAR: &str = "HUMANY_STATISTICS";

/// Settings for building a [`ServiceClient`](crate::ServiceClient).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Interface URL, e.g. `https://{tenant}.humany.net/{interface}/`.
    pub service_url: String,
    /// Per-user client id sent as the `client` default.
    pub client: Option<String>,
    pub language: Option<String>,
    pub site: Option<String>,
    /// Traffic source tag sent as the `funnel` default.
    pub funnel: Option<String>,
    /// POST guide lookups so they count as views.
    pub enable_statistics: bool,
}

impl ClientConfig {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            ..Default::default()
        }
    }

    /// Read configuration from `HUMANY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let service_url = read(SERVICE_URL_VAR).ok_or(HumanyError::MissingServiceUrl)?;
        let enable_statistics = read(STATISTICS_VAR)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            service_url,
            client: read(CLIENT_VAR),
            language: read(LANGUAGE_VAR),
            site: read(SITE_VAR),
            funnel: read(FUNNEL_VAR),
            enable_statistics,
        })
    }
}

/// Validate a service URL and make sure it ends with `/` so endpoint paths can be appended.
pub fn normalize_service_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| HumanyError::InvalidServiceUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(HumanyError::InvalidServiceUrl(raw.to_string()));
    }

    let mut normalized = trimmed.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}
