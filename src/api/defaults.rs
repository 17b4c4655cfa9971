// Default request parameters.
// Values are evaluated on every request so they can follow per-user or per-call state.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Source of a default parameter value.
#[derive(Clone)]
pub enum ValueProvider {
    Fixed(String),
    Lazy(Arc<dyn Fn() -> Option<String> + Send + Sync>),
}

impl ValueProvider {
    /// Provider backed by a closure, called once per request.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        ValueProvider::Lazy(Arc::new(f))
    }

    /// Current value. `None` means the parameter is left out.
    pub fn value(&self) -> Option<String> {
        match self {
            ValueProvider::Fixed(value) => Some(value.clone()),
            ValueProvider::Lazy(f) => f(),
        }
    }
}

impl fmt::Debug for ValueProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueProvider::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            ValueProvider::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<&str> for ValueProvider {
    fn from(value: &str) -> Self {
        ValueProvider::Fixed(value.to_string())
    }
}

impl From<String> for ValueProvider {
    fn from(value: String) -> Self {
        ValueProvider::Fixed(value)
    }
}

impl From<Uuid> for ValueProvider {
    fn from(value: Uuid) -> Self {
        ValueProvider::Fixed(value.to_string())
    }
}

impl From<i64> for ValueProvider {
    fn from(value: i64) -> Self {
        ValueProvider::Fixed(value.to_string())
    }
}

impl From<bool> for ValueProvider {
    fn from(value: bool) -> Self {
        ValueProvider::Fixed(value.to_string())
    }
}

/// Ordered set of named default parameters.
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    entries: Vec<(String, ValueProvider)>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a default.
    pub fn insert(&mut self, key: impl Into<String>, provider: impl Into<ValueProvider>) {
        let key = key.into();
        let provider = provider.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = provider,
            None => self.entries.push((key, provider)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ValueProvider> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, provider)| provider)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueProvider)> {
        self.entries
            .iter()
            .map(|(key, provider)| (key.as_str(), provider))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
