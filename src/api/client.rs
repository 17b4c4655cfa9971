// Humany API HTTP client.
// Builds request URLs from options and defaults, dispatches GET/POST and applies the cache hook.

use std::marker::PhantomData;

use reqwest::{Client, Response};
use tracing::debug;

use crate::cache::{PassThrough, ResponseCache};
use crate::config::{ClientConfig, normalize_service_url};
use crate::error::Result;

use super::defaults::{Defaults, ValueProvider};
use super::query::{Query, build_query};
use super::types::{Dynamic, Shapes, Typed};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for one Humany interface.
///
/// `S` picks the types responses are decoded into, `K` the cache wrapped around GET requests.
pub struct ServiceClient<S = Typed, K = PassThrough> {
    http: Client,
    service_url: String,
    defaults: Defaults,
    enable_statistics: bool,
    cache: K,
    shapes: PhantomData<fn() -> S>,
}

/// Client that decodes every response into [`serde_json::Value`].
pub type DynamicServiceClient<K = PassThrough> = ServiceClient<Dynamic, K>;

impl ServiceClient {
    /// Create a client for the given interface URL, e.g. `https://{tenant}.humany.net/{interface}/`.
    pub fn new(service_url: &str) -> Result<Self> {
        Self::from_config(ClientConfig::new(service_url))
    }

    /// Create a client with defaults and the statistics switch taken from `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let service_url = normalize_service_url(&config.service_url)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;

        let mut client = Self {
            http,
            service_url,
            defaults: Defaults::new(),
            enable_statistics: config.enable_statistics,
            cache: PassThrough,
            shapes: PhantomData,
        };

        for (key, value) in [
            ("client", config.client),
            ("language", config.language),
            ("site", config.site),
            ("funnel", config.funnel),
        ] {
            if let Some(value) = value {
                client.defaults.insert(key, value);
            }
        }

        Ok(client)
    }

    /// Create a client from `HUMANY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }
}

impl<S, K> ServiceClient<S, K> {
    /// Default `client` parameter, usually a per-user id kept between calls.
    pub fn with_client(self, client: impl Into<ValueProvider>) -> Self {
        self.with_default("client", client)
    }

    pub fn with_language(self, language: impl Into<ValueProvider>) -> Self {
        self.with_default("language", language)
    }

    pub fn with_site(self, site: impl Into<ValueProvider>) -> Self {
        self.with_default("site", site)
    }

    pub fn with_funnel(self, funnel: impl Into<ValueProvider>) -> Self {
        self.with_default("funnel", funnel)
    }

    /// Add or replace a default sent with every request unless the caller sets the key.
    pub fn with_default(mut self, key: impl Into<String>, provider: impl Into<ValueProvider>) -> Self {
        self.defaults.insert(key, provider);
        self
    }

    /// POST guide lookups so each one is counted as a view.
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.enable_statistics = enabled;
        self
    }

    /// Replace the cache wrapped around GET requests.
    pub fn with_cache<C: ResponseCache>(self, cache: C) -> ServiceClient<S, C> {
        ServiceClient {
            http: self.http,
            service_url: self.service_url,
            defaults: self.defaults,
            enable_statistics: self.enable_statistics,
            cache,
            shapes: PhantomData,
        }
    }

    /// Decode responses into another set of result types.
    pub fn with_shapes<T: Shapes>(self) -> ServiceClient<T, K> {
        ServiceClient {
            http: self.http,
            service_url: self.service_url,
            defaults: self.defaults,
            enable_statistics: self.enable_statistics,
            cache: self.cache,
            shapes: PhantomData,
        }
    }

    pub fn into_dynamic(self) -> DynamicServiceClient<K> {
        self.with_shapes::<Dynamic>()
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn statistics_enabled(&self) -> bool {
        self.enable_statistics
    }

    pub fn cache(&self) -> &K {
        &self.cache
    }

    /// Full request URL for `path` with `query` and the defaults applied.
    pub fn url_for(&self, path: &str, query: &Query) -> String {
        format!(
            "{}{}{}",
            self.service_url,
            path,
            build_query(query, &self.defaults)
        )
    }
}

impl<S: Shapes, K: ResponseCache> ServiceClient<S, K> {
    /// GET `path` through the cache hook and return the body.
    pub async fn fetch(&self, path: &str, query: &Query) -> Result<String> {
        let url = self.url_for(path, query);
        self.cache.cached(&url, || self.send_get(&url)).await
    }

    /// POST `path` with an optional body. Never cached.
    pub async fn post(&self, path: &str, body: Option<String>, query: &Query) -> Result<String> {
        let url = self.url_for(path, query);
        debug!(method = "POST", url = %url, "sending request");

        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        read_body(response).await
    }

    /// POST when statistics are enabled, GET otherwise.
    pub async fn fetch_or_post(&self, path: &str, query: &Query) -> Result<String> {
        if self.enable_statistics {
            self.post(path, None, query).await
        } else {
            self.fetch(path, query).await
        }
    }

    async fn send_get(&self, url: &str) -> Result<String> {
        debug!(method = "GET", url, "sending request");
        let response = self.http.get(url).send().await?;
        read_body(response).await
    }
}

/// Turn error statuses into errors, then read the body as text.
async fn read_body(response: Response) -> Result<String> {
    debug!(
        status = response.status().as_u16(),
        url = %response.url(),
        "response received"
    );
    let response = response.error_for_status()?;
    Ok(response.text().await?)
}
