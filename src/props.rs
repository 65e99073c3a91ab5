//! Property maps and immutable state snapshots.
//!
//! Component props, transition patches and recorded state all share one
//! representation: an ordered map from field name to JSON value. A
//! [`Snapshot`] freezes a [`Props`] behind an `Arc` so history entries can be
//! shared without copying and are never mutated after creation.

use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EngineError;

/// Ordered field map used for props, patches and state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(Map<String, Value>);

impl Props {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Interpret a JSON value as props. Only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self, EngineError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(EngineError::InvalidProps(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of `self`; fields in `other` win.
    pub fn overlay(&mut self, other: &Props) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Owned variant of [`Props::overlay`].
    pub fn overlaid(&self, other: &Props) -> Props {
        let mut merged = self.clone();
        merged.overlay(other);
        merged
    }

    /// Keep only the fields whose key is in `keys`.
    pub fn restricted_to(&self, keys: &BTreeSet<String>) -> Props {
        self.iter()
            .filter(|(key, _)| keys.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// The set of field names, used as the override-eligible key set.
    pub fn key_set(&self) -> BTreeSet<String> {
        self.0.keys().cloned().collect()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Props {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Props {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One immutable state value at a point in history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot(Arc<Props>);

impl Snapshot {
    pub fn new(props: Props) -> Self {
        Self(Arc::new(props))
    }

    pub fn props(&self) -> &Props {
        &self.0
    }

    /// A new snapshot with `patch` merged over this one. `self` is untouched.
    pub fn apply(&self, patch: &Props) -> Snapshot {
        Snapshot::new(self.0.overlaid(patch))
    }

    /// True when both handles point at the same recorded entry.
    pub fn same_entry(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Snapshot {
    type Target = Props;

    fn deref(&self) -> &Props {
        &self.0
    }
}

impl From<Props> for Snapshot {
    fn from(props: Props) -> Self {
        Snapshot::new(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_replaces_only_listed_fields() {
        let base = Props::new().with("count", 1).with("label", "a");
        let patch = Props::new().with("count", 2);
        let merged = base.overlaid(&patch);
        assert_eq!(merged.get_i64("count"), Some(2));
        assert_eq!(merged.get_str("label"), Some("a"));
        assert_eq!(base.get_i64("count"), Some(1));
    }

    #[test]
    fn restricted_to_drops_foreign_keys() {
        let props = Props::new().with("count", 9).with("wrapperProps", "x");
        let keys: BTreeSet<String> = ["count".to_string()].into_iter().collect();
        let restricted = props.restricted_to(&keys);
        assert_eq!(restricted.len(), 1);
        assert_eq!(restricted.get_i64("count"), Some(9));
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(Props::from_value(json!({"a": 1})).is_ok());
        assert!(Props::from_value(Value::Null).unwrap().is_empty());
        assert!(matches!(
            Props::from_value(json!([1, 2])),
            Err(EngineError::InvalidProps(_))
        ));
    }

    #[test]
    fn snapshot_apply_leaves_previous_intact() {
        let first = Snapshot::new(Props::new().with("count", 0));
        let second = first.apply(&Props::new().with("count", 1));
        assert_eq!(first.get_i64("count"), Some(0));
        assert_eq!(second.get_i64("count"), Some(1));
        assert!(!first.same_entry(&second));
        assert!(first.same_entry(&first.clone()));
    }

    #[test]
    fn props_serialize_as_plain_object() {
        let props = Props::new().with("count", 3);
        assert_eq!(serde_json::to_value(&props).unwrap(), json!({"count": 3}));
    }
}
