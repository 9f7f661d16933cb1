//! In-memory settings store.
//!
//! [`Store`] is a thin ordered map from keys to raw string values. It does no
//! validation and no case folding; the codec normalises keys when it fills a
//! store from a file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping of setting keys to their string values.
///
/// Iteration follows insertion order, which is the order new keys are
/// appended to the file on save.
///
/// # Example
///
/// ```
/// use envfile::Store;
///
/// let mut store = Store::new();
/// assert_eq!(store.set("PORT", "8080"), None);
/// assert_eq!(store.set("PORT", "9090"), Some("8080".to_string()));
/// assert_eq!(store.get("PORT"), Some("9090"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    entries: IndexMap<String, String>,
}

impl Store {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set the value of a key, returning its previous value.
    ///
    /// An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over all `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of settings held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no settings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every setting.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K, V> FromIterator<(K, V)> for Store
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<K, V> Extend<(K, V)> for Store
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = Store::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.get("ANY"), None);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut store = Store::new();
        assert_eq!(store.set("A", "1"), None);
        assert_eq!(store.set("A", "2"), Some("1".to_string()));
        assert_eq!(store.get("A"), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_keys_are_opaque() {
        let mut store = Store::new();
        store.set("name", "lower");
        store.set("NAME", "upper");
        assert_eq!(store.get("name"), Some("lower"));
        assert_eq!(store.get("NAME"), Some("upper"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insertion_order_survives_overwrite_and_remove() {
        let mut store: Store = [("C", "3"), ("A", "1"), ("B", "2")].into_iter().collect();
        store.set("A", "10");
        assert_eq!(store.remove("C"), Some("3".to_string()));

        let keys: Vec<_> = store.keys().collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert!(!store.contains_key("C"));
    }

    #[test]
    fn test_clear() {
        let mut store: Store = [("A", "1")].into_iter().collect();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_serializes_as_map() {
        let store: Store = [("B", "2"), ("A", "1")].into_iter().collect();
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"B":"2","A":"1"}"#);

        let back: Store = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
