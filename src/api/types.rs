// Humany API response types.
// Defines result envelopes and DTOs for guides, categories and portal configuration.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Result types a client decodes responses into.
pub trait Shapes {
    type Guide: DeserializeOwned;
    type Category: DeserializeOwned;
    type Portal: DeserializeOwned;
}

/// Decodes into [`Guide`], [`Category`] and [`Portal`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Typed;

impl Shapes for Typed {
    type Guide = Guide;
    type Category = Category;
    type Portal = Portal;
}

/// Decodes every shape into a raw [`serde_json::Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Dynamic;

impl Shapes for Dynamic {
    type Guide = serde_json::Value;
    type Category = serde_json::Value;
    type Portal = serde_json::Value;
}

/// Guide search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", bound(deserialize = "G: Deserialize<'de>"))]
pub struct GuidesResult<G> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_matches: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<G>,
}

/// Category tree result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", bound(deserialize = "C: Deserialize<'de>"))]
pub struct CategoriesResult<C> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub guides_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<C>,
}

/// Knowledge-base article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Guide {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub attributes: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub perspectives: HashMap<String, String>,
    /// Language code to the id of the translated guide.
    #[serde(deserialize_with = "null_as_default")]
    pub translations: HashMap<String, u64>,
    #[serde(rename = "Type")]
    pub guide_type: Option<String>,
}

/// Node in the category taxonomy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Category {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attributes: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<Category>,
    #[serde(deserialize_with = "null_as_default")]
    pub guides_count: u64,
}

/// Help portal configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Portal {
    pub uri_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    pub title: Option<String>,
    pub language: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub attributes: HashMap<String, String>,
    pub interface: Option<PortalInterface>,
    #[serde(deserialize_with = "null_as_default")]
    pub perspectives: Vec<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub perspective_names: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub enabled_languages: Vec<PortalTranslation>,
}

/// Presentation settings of a portal interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PortalInterface {
    #[serde(deserialize_with = "null_as_default")]
    pub page_size: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub show_last_created: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub last_created_guides_page_size: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub show_portals_language_switch: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_guides_language_switch: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_guide_perspectives_switch: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_categories_in_results: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_alert_message: bool,
    pub alert_message: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub show_free_text: bool,
    pub free_text: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub show_portal_feedback: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_guides_feedback: bool,
}

/// Language a portal is published in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PortalTranslation {
    #[serde(deserialize_with = "null_as_default")]
    pub language_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub portal_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub uri_name: String,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Timestamps with or without an offset. Offset-less values are taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }

        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}
