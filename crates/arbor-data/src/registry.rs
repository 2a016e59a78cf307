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

//! The identity registry: names, uids, domains and the type index of live nodes.

use std::any::TypeId;
use std::collections::HashMap;

use arbor_core::{
    ClassInfo, NameClaim, NameTable, NodeId, NodeUid, TreeError, TypeIndexedCollection, TypeKey,
};

use crate::behavior::ComponentNode;
use crate::tree::NodeRecord;

/// Bookkeeping of every live node that is independent of the parent/child links.
///
/// The tree registers a node right after storing it and unregisters it right
/// before freeing its slot, so the registry never refers to a dead handle.
#[derive(Debug)]
pub struct NodeRegistry {
    names: NameTable,
    index: TypeIndexedCollection<NodeId>,
    domains: HashMap<String, Vec<NodeId>>,
    uids: HashMap<NodeUid, NodeId>,
}

impl NodeRegistry {
    /// Creates an empty registry. `forbid_duplicates` is forwarded to the type index.
    pub fn new(forbid_duplicates: bool) -> Self {
        Self {
            names: NameTable::new(),
            index: TypeIndexedCollection::with_root(TypeKey::of::<ComponentNode>())
                .forbid_duplicates(forbid_duplicates),
            domains: HashMap::new(),
            uids: HashMap::new(),
        }
    }

    /// Files a stored node under its uid, name, class and domain.
    ///
    /// Returns the name claim; `collided` is set when `requested` was taken.
    pub fn register(
        &mut self,
        node: NodeId,
        record: &NodeRecord,
        requested: Option<&str>,
    ) -> Result<NameClaim, TreeError> {
        if self.uids.contains_key(&record.uid) {
            return Err(TreeError::DuplicateUid(record.uid));
        }
        self.uids.insert(record.uid, node);

        let class = record.class;
        let claim = self
            .names
            .claim(class.key().id(), class.name(), requested, node);
        self.index.insert(node, class);
        self.domains
            .entry(record.domain.clone())
            .or_default()
            .push(node);
        Ok(claim)
    }

    /// Removes every filing of `node`. Returns `false` if it was not registered.
    pub fn unregister(&mut self, node: NodeId, record: &NodeRecord) -> bool {
        if self.uids.get(&record.uid) != Some(&node) {
            return false;
        }
        self.uids.remove(&record.uid);
        self.names
            .release(record.class.key().id(), &record.name, node);
        self.index.remove(&node);

        if let Some(members) = self.domains.get_mut(&record.domain) {
            members.retain(|member| *member != node);
            if members.is_empty() {
                self.domains.remove(&record.domain);
            }
        }
        true
    }

    /// Releases the current name and claims a new one in the same class scope.
    pub(crate) fn rename(
        &mut self,
        node: NodeId,
        record: &NodeRecord,
        requested: &str,
    ) -> NameClaim {
        let scope = record.class.key().id();
        self.names.release(scope, &record.name, node);
        self.names
            .claim(scope, record.class.name(), Some(requested), node)
    }

    /// Moves `node` from uid `old` to uid `new`.
    pub(crate) fn reassign_uid(
        &mut self,
        node: NodeId,
        old: NodeUid,
        new: NodeUid,
    ) -> Result<(), TreeError> {
        if self.uids.contains_key(&new) {
            return Err(TreeError::DuplicateUid(new));
        }
        self.uids.remove(&old);
        self.uids.insert(new, node);
        Ok(())
    }

    /// Finds a node by name among nodes whose concrete class is `T`.
    pub fn find_by_name<T: ?Sized + 'static>(&self, name: &str) -> Option<NodeId> {
        self.names.lookup(TypeId::of::<T>(), name)
    }

    /// Finds a node by name among nodes of the given concrete class.
    pub fn find_by_class_name(&self, class: &ClassInfo, name: &str) -> Option<NodeId> {
        self.names.lookup(class.key().id(), name)
    }

    /// Finds a node by uid.
    pub fn find_by_uid(&self, uid: NodeUid) -> Option<NodeId> {
        self.uids.get(&uid).copied()
    }

    /// Every node assignable to `T`, in creation order.
    ///
    /// `ComponentNode` is the index root and is never filed; use
    /// [`NodeTree::iter`](crate::NodeTree::iter) to visit every node.
    pub fn query_all<T: ?Sized + 'static>(&self) -> std::slice::Iter<'_, NodeId> {
        self.index.query_all::<T>()
    }

    /// Returns `true` if instances of `class` are assignable to the type `key`.
    pub fn is_a(&self, class: &ClassInfo, key: TypeId) -> bool {
        self.index.is_a(class, key)
    }

    /// The members of a domain, in creation order.
    pub fn domain(&self, name: &str) -> &[NodeId] {
        self.domains.get(name).map_or(&[], Vec::as_slice)
    }

    /// The names of every non-empty domain.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// The underlying type index.
    pub fn index(&self) -> &TypeIndexedCollection<NodeId> {
        &self.index
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.uids.len()
    }

    /// Returns `true` if no node is registered.
    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new(cfg!(debug_assertions))
    }
}
