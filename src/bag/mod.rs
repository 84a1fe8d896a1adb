//! Event bag — the parameter container for one push
//!
//! A bag maps case-sensitive parameter names to loosely-typed values and
//! remembers insertion order. Handlers consume keys they have extracted,
//! so whatever remains afterwards is the set of extra parameters.

mod json;
mod value;

pub use json::from_json;
pub use value::{EventValue, Handle};

/// A string-keyed, insertion-ordered parameter bag.
///
/// Bags are small (a handful of keys per push), so entries live in a
/// vector and lookups are linear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBag {
    entries: Vec<(String, EventValue)>,
}

impl EventBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<EventValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing (in place) any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<EventValue>) -> Option<EventValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&EventValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<EventValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<EventValue>> FromIterator<(K, V)> for EventBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}

impl IntoIterator for EventBag {
    type Item = (String, EventValue);
    type IntoIter = std::vec::IntoIter<(String, EventValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
