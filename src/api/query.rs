// Option bags and query-string construction.
// Merges client defaults, expands custom `p.` parameters and percent-encodes the result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HumanyError, Result};

use super::defaults::Defaults;

/// Key holding a nested map of custom parameters, matched case-insensitively.
const PARAMETERS_KEY: &str = "parameters";

/// Prefix the API expects on custom attribute filters.
const CUSTOM_PREFIX: &str = "p.";

/// Value of a single option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Present but empty. Suppresses a default and is never transmitted.
    Null,
    Text(String),
    /// Nested map, used for the `parameters` entry.
    Map(Vec<(String, String)>),
}

impl QueryValue {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => QueryValue::Null,
            Value::String(text) => QueryValue::Text(text),
            Value::Array(items) => {
                QueryValue::Text(items.iter().filter_map(json_text).collect::<Vec<_>>().join(","))
            }
            Value::Object(map) => QueryValue::Map(
                map.iter()
                    .filter_map(|(key, value)| json_text(value).map(|text| (key.clone(), text)))
                    .collect(),
            ),
            other => QueryValue::Text(other.to_string()),
        }
    }
}

/// Text form of a JSON value, `None` for null.
fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Text(value.clone())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Null, Into::into)
    }
}

impl From<Expand> for QueryValue {
    fn from(value: Expand) -> Self {
        QueryValue::Text(value.as_str().to_string())
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for QueryValue {
    fn from(entries: Vec<(K, V)>) -> Self {
        QueryValue::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

macro_rules! display_query_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Text(value.to_string())
                }
            }
        )*
    };
}

display_query_value!(bool, i32, i64, u32, u64, usize);

/// How much of the category tree to include in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expand {
    None,
    Children,
    Descendant,
}

impl Expand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Expand::None => "None",
            Expand::Children => "Children",
            Expand::Descendant => "Descendant",
        }
    }
}

/// Options for a single request.
///
/// Insertion order is kept; setting a key that already exists replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    entries: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from any record that serializes to a JSON object.
    ///
    /// Field names are used verbatim, so `#[serde(rename_all = "camelCase")]` turns
    /// `p_category` into `pCategory` and from there into `p.category`.
    pub fn from_serializable<T: Serialize + ?Sized>(record: &T) -> Result<Self> {
        match serde_json::to_value(record)? {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key, QueryValue::from_json(value)))
                .collect()),
            other => Err(HumanyError::InvalidQuery(format!(
                "options must serialize to an object, got {}",
                other
            ))),
        }
    }

    /// Set a value, builder style.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a value, replacing any existing entry with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Add one entry to the nested `parameters` map, sent as `p.<key>`.
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        let slot = self
            .entries
            .iter_mut()
            .find(|(existing, entry)| is_parameters_key(existing) && matches!(entry, QueryValue::Map(_)));

        match slot {
            Some((_, QueryValue::Map(map))) => match map.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => map.push((key, value)),
            },
            _ => self.insert(PARAMETERS_KEY, QueryValue::Map(vec![(key, value)])),
        }
        self
    }

    pub fn language(self, language: impl Into<String>) -> Self {
        self.set("language", language.into())
    }

    pub fn expand(self, expand: Expand) -> Self {
        self.set("expand", expand)
    }

    /// Restrict to the given category ids.
    pub fn categories(self, ids: &[u64]) -> Self {
        let joined = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
        self.set("categories", joined)
    }

    pub fn attributes(self, attributes: impl Into<String>) -> Self {
        self.set("attributes", attributes.into())
    }

    pub fn phrase(self, phrase: impl Into<String>) -> Self {
        self.set("phrase", phrase.into())
    }

    pub fn skip(self, skip: u32) -> Self {
        self.set("skip", skip)
    }

    pub fn take(self, take: u32) -> Self {
        self.set("take", take)
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let index = self.entries.iter().position(|(existing, _)| existing == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for Query {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl From<&Query> for Query {
    fn from(query: &Query) -> Self {
        query.clone()
    }
}

fn is_parameters_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(PARAMETERS_KEY)
}

/// Wire name for a `pFooBar` style key (`p.fooBar`), or `None` if the key is not one.
fn custom_parameter_name(key: &str) -> Option<String> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some('p'), Some(first)) if first.is_uppercase() => Some(format!(
            "{}{}{}",
            CUSTOM_PREFIX,
            first.to_lowercase(),
            chars.as_str()
        )),
        _ => None,
    }
}

/// Build the query string for a request, including the leading `?`.
///
/// Returns an empty string when nothing is left to send.
pub fn build_query(query: &Query, defaults: &Defaults) -> String {
    let mut merged = query.clone();
    for (key, provider) in defaults.iter() {
        if !merged.contains_key(key) {
            merged.insert(key, provider.value());
        }
    }

    // Renamed keys win over literal `p.` keys, nested parameters win over both.
    let mut params = Query::new();
    let mut renamed = Vec::new();
    for (key, value) in merged.entries {
        match custom_parameter_name(&key) {
            Some(name) => renamed.push((name, value)),
            None => params.insert(key, value),
        }
    }
    for (name, value) in renamed {
        params.insert(name, value);
    }

    let nested: Vec<String> = params
        .iter()
        .filter(|(key, value)| is_parameters_key(key) && matches!(value, QueryValue::Map(_)))
        .map(|(key, _)| key.to_string())
        .collect();
    for key in nested {
        if let Some(QueryValue::Map(map)) = params.remove(&key) {
            for (name, value) in map {
                params.insert(format!("{}{}", CUSTOM_PREFIX, name), value);
            }
        }
    }

    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                QueryValue::Null => return None,
                QueryValue::Text(text) => text.clone(),
                QueryValue::Map(map) => map
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(","),
            };
            Some(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&text)
            ))
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::api::defaults::ValueProvider;

    fn pairs(query_string: &str) -> HashSet<(String, String)> {
        query_string
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap();
                (
                    urlencoding::decode(key).unwrap().into_owned(),
                    urlencoding::decode(value).unwrap().into_owned(),
                )
            })
            .collect()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_phrase_custom_parameter_and_default_language() {
        let mut defaults = Defaults::new();
        defaults.insert("language", "en");
        let query = Query::new().set("phrase", "guide").set("pCategory", "5");

        let built = build_query(&query, &defaults);

        assert!(built.starts_with('?'));
        assert_eq!(
            pairs(&built),
            HashSet::from([
                pair("phrase", "guide"),
                pair("p.category", "5"),
                pair("language", "en"),
            ])
        );
    }

    #[test]
    fn test_nested_parameters_are_flattened() {
        let query = Query::new().set("parameters", vec![("color", "red")]);
        let built = build_query(&query, &Defaults::new());
        assert_eq!(pairs(&built), HashSet::from([pair("p.color", "red")]));
    }

    #[test]
    fn test_parameters_key_is_case_insensitive() {
        let query = Query::new()
            .set("Parameters", vec![("size", "large")])
            .set("PARAMETERS", vec![("shape", "round")]);
        let built = build_query(&query, &Defaults::new());
        assert_eq!(
            pairs(&built),
            HashSet::from([pair("p.size", "large"), pair("p.shape", "round")])
        );
    }

    #[test]
    fn test_parameters_that_are_not_a_map_are_kept() {
        let query = Query::new().set("parameters", "raw");
        let built = build_query(&query, &Defaults::new());
        assert_eq!(pairs(&built), HashSet::from([pair("parameters", "raw")]));
    }

    #[test]
    fn test_parameter_builder_accumulates_entries() {
        let query = Query::new()
            .parameter("color", "red")
            .parameter("size", "xl")
            .parameter("color", "blue");
        let built = build_query(&query, &Defaults::new());
        assert_eq!(
            pairs(&built),
            HashSet::from([pair("p.color", "blue"), pair("p.size", "xl")])
        );
    }

    #[test]
    fn test_custom_parameter_name() {
        assert_eq!(custom_parameter_name("pCategory").as_deref(), Some("p.category"));
        assert_eq!(custom_parameter_name("pFooBar").as_deref(), Some("p.fooBar"));
        assert_eq!(custom_parameter_name("pX").as_deref(), Some("p.x"));
        assert_eq!(custom_parameter_name("phrase"), None);
        assert_eq!(custom_parameter_name("p"), None);
        assert_eq!(custom_parameter_name("PCategory"), None);
        assert_eq!(custom_parameter_name("parameters"), None);
    }

    #[test]
    fn test_custom_parameter_precedence() {
        let query = Query::new()
            .set("p.color", "literal")
            .set("pColor", "renamed");
        assert_eq!(build_query(&query, &Defaults::new()), "?p.color=renamed");

        let query = query.parameter("color", "nested");
        assert_eq!(build_query(&query, &Defaults::new()), "?p.color=nested");

        let mut defaults = Defaults::new();
        defaults.insert("p.color", "default");
        let query = Query::new().set("pColor", "caller");
        assert_eq!(build_query(&query, &defaults), "?p.color=caller");
    }

    #[test]
    fn test_every_plain_key_appears_once() {
        let query = Query::new()
            .set("phrase", "reset password")
            .set("skip", 0u32)
            .set("take", 10u32)
            .set("expand", Expand::Children);
        let built = build_query(&query, &Defaults::new());

        let keys: Vec<&str> = built
            .trim_start_matches('?')
            .split('&')
            .map(|pair| pair.split_once('=').unwrap().0)
            .collect();
        assert_eq!(keys.len(), 4);
        for key in ["phrase", "skip", "take", "expand"] {
            assert_eq!(keys.iter().filter(|k| **k == key).count(), 1, "{key}");
        }
    }

    #[test]
    fn test_caller_value_wins_over_default() {
        let mut defaults = Defaults::new();
        defaults.insert("language", "en");
        defaults.insert("site", "/faq");

        let query = Query::new().language("sv");
        let built = build_query(&query, &defaults);

        assert_eq!(
            pairs(&built),
            HashSet::from([pair("language", "sv"), pair("site", "/faq")])
        );
    }

    #[test]
    fn test_null_values_are_dropped() {
        let query = Query::new()
            .set("phrase", None::<String>)
            .set("take", 5u32);
        let built = build_query(&query, &Defaults::new());
        assert_eq!(pairs(&built), HashSet::from([pair("take", "5")]));
    }

    #[test]
    fn test_explicit_null_suppresses_default() {
        let mut defaults = Defaults::new();
        defaults.insert("language", "en");
        let query = Query::new().set("language", QueryValue::Null);
        assert_eq!(build_query(&query, &defaults), "");
    }

    #[test]
    fn test_default_without_value_is_dropped() {
        let mut defaults = Defaults::new();
        defaults.insert("funnel", ValueProvider::from_fn(|| None));
        defaults.insert("client", "abc");
        let built = build_query(&Query::new(), &defaults);
        assert_eq!(pairs(&built), HashSet::from([pair("client", "abc")]));
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let query = Query::new()
            .phrase("reset & unlock")
            .attributes("Product=Mobile Bank");
        let built = build_query(&query, &Defaults::new());

        assert!(built.contains("phrase=reset%20%26%20unlock"));
        assert!(built.contains("attributes=Product%3DMobile%20Bank"));
        assert_eq!(
            pairs(&built),
            HashSet::from([
                pair("phrase", "reset & unlock"),
                pair("attributes", "Product=Mobile Bank"),
            ])
        );
    }

    #[test]
    fn test_empty_query_builds_empty_string() {
        assert_eq!(build_query(&Query::new(), &Defaults::new()), "");
    }

    #[test]
    fn test_categories_are_comma_joined() {
        let query = Query::new().categories(&[1, 2, 3]);
        let built = build_query(&query, &Defaults::new());
        assert_eq!(pairs(&built), HashSet::from([pair("categories", "1,2,3")]));
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SearchOptions {
        phrase: &'static str,
        p_category: u32,
        take: Option<u32>,
        categories: Vec<u32>,
        parameters: std::collections::BTreeMap<&'static str, &'static str>,
    }

    #[test]
    fn test_from_serializable_record() {
        let options = SearchOptions {
            phrase: "guide",
            p_category: 5,
            take: None,
            categories: vec![4, 8],
            parameters: [("color", "red")].into_iter().collect(),
        };
        let query = Query::from_serializable(&options).unwrap();

        assert_eq!(query.get("take"), Some(&QueryValue::Null));
        assert_eq!(query.get("categories"), Some(&QueryValue::Text("4,8".into())));

        let built = build_query(&query, &Defaults::new());
        assert_eq!(
            pairs(&built),
            HashSet::from([
                pair("phrase", "guide"),
                pair("p.category", "5"),
                pair("categories", "4,8"),
                pair("p.color", "red"),
            ])
        );
    }

    #[test]
    fn test_from_serializable_rejects_non_objects() {
        assert!(Query::from_serializable(&()).unwrap().is_empty());
        let err = Query::from_serializable(&"phrase").unwrap_err();
        assert!(matches!(err, HumanyError::InvalidQuery(_)));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut query = Query::from([("a", "1"), ("b", "2")]);
        query.insert("a", "3");

        let entries: Vec<_> = query.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("a", &QueryValue::Text("3".into())));
        assert_eq!(query.remove("b"), Some(QueryValue::Text("2".into())));
        assert_eq!(query.len(), 1);
    }
}
