//! Construction options and per-type defaults.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Merged options handed to a view at construction.
pub type Options = serde_json::Map<String, Value>;

/// Options as supplied by the caller, where a key may be present but
/// undefined (`None`). Undefined keys are stripped before merging so they
/// never shadow a default. JSON `null` is a real value and is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOptions(BTreeMap<String, Option<Value>>);

impl RawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), Some(value.into()));
        self
    }

    /// Mark `key` as present but undefined.
    pub fn undefined(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into(), None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<Value>) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop undefined keys.
    pub fn into_defined(self) -> Options {
        self.0
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect()
    }
}

impl From<Options> for RawOptions {
    fn from(options: Options) -> Self {
        Self(options.into_iter().map(|(k, v)| (k, Some(v))).collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Option<Value>)> for RawOptions {
    fn from_iter<I: IntoIterator<Item = (K, Option<Value>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Default options for a view type.
#[derive(Debug, Clone, Default)]
pub enum Defaults {
    #[default]
    None,
    /// A fixed set of defaults.
    Value(Options),
    /// Defaults computed each time a view is constructed.
    Lazy(fn() -> Options),
}

impl Defaults {
    pub fn resolve(&self) -> Options {
        match self {
            Self::None => Options::new(),
            Self::Value(options) => options.clone(),
            Self::Lazy(compute) => compute(),
        }
    }
}

impl From<Options> for Defaults {
    fn from(options: Options) -> Self {
        Self::Value(options)
    }
}

/// Strip undefined keys from `raw`, then lay the rest over `defaults`.
pub fn merge_options(raw: RawOptions, defaults: &Defaults) -> Options {
    let mut merged = defaults.resolve();
    merged.extend(raw.into_defined());
    merged
}

/// Deserialize `options[key]` into `T`. Missing keys and type mismatches
/// both yield `None`.
pub fn option_as<T: DeserializeOwned>(options: &Options, key: &str) -> Option<T> {
    options
        .get(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}
