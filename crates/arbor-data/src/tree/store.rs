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

//! Internal node storage and handle management.

use arbor_core::NodeId;

use super::record::NodeRecord;

/// Internal arena of node slots.
///
/// The `NodeStore` maintains a dense list of slots, each holding the current
/// `NodeId` (including generation) and the record, which is `Some` only while the
/// node is alive. Freed indices are recycled with an incremented generation.
#[derive(Default)]
pub(crate) struct NodeStore {
    slots: Vec<(NodeId, Option<NodeRecord>)>,
    /// Indices available for reuse, enabling O(1) allocation after a destroy.
    freed: Vec<u32>,
    live: usize,
}

impl NodeStore {
    /// Stores a record in a new or recycled slot and returns its handle.
    pub fn insert(&mut self, record: NodeRecord) -> NodeId {
        self.live += 1;
        if let Some(index) = self.freed.pop() {
            let (id_slot, record_slot) = &mut self.slots[index as usize];
            id_slot.generation = id_slot.generation.wrapping_add(1);
            *record_slot = Some(record);
            *id_slot
        } else {
            let id = NodeId {
                index: self.slots.len() as u32,
                generation: 0,
            };
            self.slots.push((id, Some(record)));
            id
        }
    }

    /// Removes the record of a live node and frees its slot.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeRecord> {
        let (slot_id, record) = self.slots.get_mut(id.index as usize)?;
        if slot_id.generation != id.generation {
            return None;
        }
        let record = record.take()?;
        self.freed.push(id.index);
        self.live -= 1;
        Some(record)
    }

    /// Returns the record if the generation of `id` matches the slot.
    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.slots
            .get(id.index as usize)
            .and_then(|(slot_id, record)| {
                if slot_id.generation == id.generation {
                    record.as_ref()
                } else {
                    None
                }
            })
    }

    /// Returns the record mutably if the generation of `id` matches the slot.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeRecord> {
        self.slots
            .get_mut(id.index as usize)
            .and_then(|(slot_id, record)| {
                if slot_id.generation == id.generation {
                    record.as_mut()
                } else {
                    None
                }
            })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Iterates over live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeRecord)> {
        self.slots
            .iter()
            .filter_map(|(id, record)| record.as_ref().map(|record| (*id, record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::COMPONENT_NODE;
    use crate::tree::NodeBuilder;

    fn record() -> NodeRecord {
        NodeBuilder::component().into_record(&COMPONENT_NODE, "default".to_string())
    }

    #[test]
    fn test_recycled_slot_generation_wraps() {
        // --- ARRANGE ---
        let mut store = NodeStore::default();
        let first = store.insert(record());
        store.slots[0].0.generation = u32::MAX;
        let stale = store.slots[0].0;

        // --- ACT ---
        assert!(store.remove(stale).is_some());
        let recycled = store.insert(record());

        // --- ASSERT ---
        assert_eq!(recycled.index, first.index);
        assert_eq!(recycled.generation, 0);
        assert!(!store.contains(stale));
        assert_eq!(store.len(), 1);
    }
}
