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

use arbor_core::{NodeId, TraitValue, TreeError, TreeEvent};

use super::NodeTree;

impl NodeTree {
    /// Adds a trait to a node, creating its bag on first use.
    ///
    /// Returns `Ok(false)` and keeps the existing value if `key` is already present.
    pub fn add_trait(
        &mut self,
        node: NodeId,
        key: &str,
        value: TraitValue,
    ) -> Result<bool, TreeError> {
        let bag = self.record_mut(node)?.traits.get_or_insert_with(Default::default);
        Ok(bag.add(key, value))
    }

    /// Returns the trait stored under `key`.
    pub fn trait_value(&self, node: NodeId, key: &str) -> Option<&TraitValue> {
        self.store.get(node)?.traits.as_ref()?.get(key)
    }

    /// Sets a trait, replacing any previous value, and publishes `TraitSet`.
    pub fn set_trait(
        &mut self,
        node: NodeId,
        key: &str,
        value: TraitValue,
    ) -> Result<Option<TraitValue>, TreeError> {
        let bag = self.record_mut(node)?.traits.get_or_insert_with(Default::default);
        let previous = bag.set(key, value.clone());
        self.events.publish(TreeEvent::TraitSet {
            node,
            key: key.to_string(),
            value,
        });
        Ok(previous)
    }

    /// Removes a trait and returns its value.
    pub fn remove_trait(&mut self, node: NodeId, key: &str) -> Result<Option<TraitValue>, TreeError> {
        Ok(self
            .record_mut(node)?
            .traits
            .as_mut()
            .and_then(|bag| bag.remove(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeBuilder;

    #[test]
    fn test_trait_lifecycle() {
        // --- ARRANGE ---
        let mut tree = NodeTree::default();
        let node = tree.spawn(NodeBuilder::component()).unwrap();
        tree.events().drain();

        // --- ACT ---
        let added = tree.add_trait(node, "health", TraitValue::Int(100)).unwrap();
        let added_again = tree.add_trait(node, "health", TraitValue::Int(5)).unwrap();
        let previous = tree.set_trait(node, "health", TraitValue::Int(80)).unwrap();

        // --- ASSERT ---
        assert!(added);
        assert!(!added_again);
        assert_eq!(previous, Some(TraitValue::Int(100)));
        assert_eq!(tree.trait_value(node, "health"), Some(&TraitValue::Int(80)));
        assert_eq!(
            tree.events().drain(),
            vec![TreeEvent::TraitSet {
                node,
                key: "health".to_string(),
                value: TraitValue::Int(80)
            }]
        );

        assert_eq!(
            tree.remove_trait(node, "health"),
            Ok(Some(TraitValue::Int(80)))
        );
        assert_eq!(tree.trait_value(node, "health"), None);
    }

    #[test]
    fn test_node_without_bag_has_no_traits() {
        let mut tree = NodeTree::default();
        let node = tree.spawn(NodeBuilder::component()).unwrap();

        assert_eq!(tree.trait_value(node, "anything"), None);
        assert_eq!(tree.remove_trait(node, "anything"), Ok(None));
        assert!(tree.node(node).unwrap().traits().is_none());
    }
}
