// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Ad hoc per-node state keyed by string.
//!
//! Leaf subsystems attach small pieces of typed state to a node through its trait
//! bag instead of defining a new node class. The set of value kinds is closed.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// A value stored in a node's trait bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraitValue {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Text(String),
    /// A 2-D vector.
    Vec2(Vec2),
    /// A 3-D vector.
    Vec3(Vec3),
    /// A reference to another node. It is not kept alive by the bag.
    Node(NodeId),
}

impl TraitValue {
    /// Returns the name of the value kind, used in log messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TraitValue::Bool(_) => "bool",
            TraitValue::Int(_) => "int",
            TraitValue::Float(_) => "float",
            TraitValue::Text(_) => "text",
            TraitValue::Vec2(_) => "vec2",
            TraitValue::Vec3(_) => "vec3",
            TraitValue::Node(_) => "node",
        }
    }

    /// Returns the boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TraitValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TraitValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the number, if this is a `Float` or an `Int`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TraitValue::Float(v) => Some(*v),
            TraitValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the string, if this is a `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TraitValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the node handle, if this is a `Node`.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            TraitValue::Node(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for TraitValue {
    fn from(value: bool) -> Self {
        TraitValue::Bool(value)
    }
}

impl From<i64> for TraitValue {
    fn from(value: i64) -> Self {
        TraitValue::Int(value)
    }
}

impl From<f64> for TraitValue {
    fn from(value: f64) -> Self {
        TraitValue::Float(value)
    }
}

impl From<&str> for TraitValue {
    fn from(value: &str) -> Self {
        TraitValue::Text(value.to_string())
    }
}

impl From<String> for TraitValue {
    fn from(value: String) -> Self {
        TraitValue::Text(value)
    }
}

impl From<Vec2> for TraitValue {
    fn from(value: Vec2) -> Self {
        TraitValue::Vec2(value)
    }
}

impl From<Vec3> for TraitValue {
    fn from(value: Vec3) -> Self {
        TraitValue::Vec3(value)
    }
}

impl From<NodeId> for TraitValue {
    fn from(value: NodeId) -> Self {
        TraitValue::Node(value)
    }
}

/// A string-keyed map of [`TraitValue`]s.
///
/// `set` replaces values of any kind; callers that care about the kind check it
/// through the typed accessors of [`TraitValue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitBag {
    values: HashMap<String, TraitValue>,
}

impl TraitBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new entry. Returns `false` and leaves the bag untouched if the key exists.
    pub fn add(&mut self, key: impl Into<String>, value: TraitValue) -> bool {
        match self.values.entry(key.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&TraitValue> {
        self.values.get(key)
    }

    /// Inserts or replaces the value under `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: TraitValue) -> Option<TraitValue> {
        self.values.insert(key.into(), value)
    }

    /// Removes and returns the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<TraitValue> {
        self.values.remove(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns an iterator over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TraitValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bag holds no entry.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_refuses_existing_key() {
        // --- ARRANGE ---
        let mut bag = TraitBag::new();

        // --- ACT ---
        let first = bag.add("speed", TraitValue::Float(2.5));
        let second = bag.add("speed", TraitValue::Float(9.0));

        // --- ASSERT ---
        assert!(first);
        assert!(!second);
        assert_eq!(bag.get("speed"), Some(&TraitValue::Float(2.5)));
    }

    #[test]
    fn test_set_replaces_and_returns_previous() {
        let mut bag = TraitBag::new();
        assert_eq!(bag.set("label", "start".into()), None);

        let previous = bag.set("label", TraitValue::Int(4));

        assert_eq!(previous, Some(TraitValue::Text("start".to_string())));
        assert_eq!(bag.get("label").and_then(TraitValue::as_int), Some(4));
    }

    #[test]
    fn test_remove() {
        let mut bag = TraitBag::new();
        bag.add("visible_in_editor", true.into());

        assert_eq!(bag.remove("visible_in_editor"), Some(TraitValue::Bool(true)));
        assert_eq!(bag.remove("visible_in_editor"), None);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(TraitValue::Int(3).as_float(), Some(3.0));
        assert_eq!(TraitValue::Text("a".into()).as_bool(), None);
        assert_eq!(TraitValue::Vec3(Vec3::X).kind_name(), "vec3");
    }

    #[test]
    fn test_bag_ron_round_trip() {
        let mut bag = TraitBag::new();
        bag.add("offset", Vec2::new(1.0, -2.0).into());

        let text = ron::to_string(&bag).expect("Serialization should succeed");
        let restored: TraitBag = ron::from_str(&text).expect("Deserialization should succeed");

        assert_eq!(restored, bag);
    }
}
