// Humany API endpoint functions.
// Provides typed methods for guides, categories and portal configuration.

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::cache::ResponseCache;
use crate::error::Result;

use super::client::ServiceClient;
use super::query::Query;
use super::types::{CategoriesResult, GuidesResult, Shapes};

impl<S: Shapes, K: ResponseCache> ServiceClient<S, K> {
    /// Search or list guides.
    ///
    /// Recognized options include `phrase`, `language`, `skip`, `take`, `expand`,
    /// `categories`, `attributes`, `parameters` and `pName` custom filters.
    /// Counted as a view (POST) when statistics are enabled.
    pub async fn get_guides(&self, query: impl Into<Query>) -> Result<GuidesResult<S::Guide>> {
        let json = self.fetch_or_post("guides", &query.into()).await?;
        decode(&json)
    }

    /// Get a single guide. Counted as a view (POST) when statistics are enabled.
    pub async fn get_guide(&self, id: u64, query: impl Into<Query>) -> Result<S::Guide> {
        let json = self
            .fetch_or_post(&format!("guides/{}", id), &query.into())
            .await?;
        decode(&json)
    }

    /// Get the category tree, with guide counts matching the options.
    pub async fn get_categories(
        &self,
        query: impl Into<Query>,
    ) -> Result<CategoriesResult<S::Category>> {
        let json = self.fetch("categories", &query.into()).await?;
        decode(&json)
    }

    /// Get a single category, typically with `expand`.
    pub async fn get_category(&self, id: u64, query: impl Into<Query>) -> Result<S::Category> {
        let json = self
            .fetch(&format!("categories/{}", id), &query.into())
            .await?;
        decode(&json)
    }

    /// Get the interface configuration.
    pub async fn get_config(&self, query: impl Into<Query>) -> Result<S::Portal> {
        let json = self.fetch("config", &query.into()).await?;
        decode(&json)
    }
}

fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
    trace!(bytes = json.len(), "decoding response");
    Ok(serde_json::from_str(json)?)
}
