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

//! Node identity: persistent unique ids and collision-safe human names.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::NodeId;

/// A globally unique, persistent identifier for a node.
///
/// Unlike a [`NodeId`], which is only an arena handle and is recycled, a `NodeUid`
/// survives persistence round trips and is what external documents refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeUid(Uuid);

impl NodeUid {
    /// Creates a new, random (version 4) `NodeUid`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID, e.g. one read back from a document.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeUid {
    /// Creates a new, random (version 4) `NodeUid`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The outcome of claiming a name in a [`NameTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameClaim {
    /// The name actually assigned.
    pub name: String,
    /// `true` if the requested name was taken and a generated default was used instead.
    pub collided: bool,
}

/// Keeps node names unique per class scope.
///
/// Two nodes of different concrete classes may share a name; two nodes of the same
/// class may not. A colliding claim is resolved by generating `<ClassName><n>`.
#[derive(Debug, Default)]
pub struct NameTable {
    names: HashMap<(TypeId, String), NodeId>,
    counters: HashMap<TypeId, u32>,
}

impl NameTable {
    /// Creates an empty name table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a name for `owner` in the given class scope.
    ///
    /// `None` or an empty request yields a generated default without reporting a
    /// collision.
    pub fn claim(
        &mut self,
        scope: TypeId,
        class_name: &str,
        requested: Option<&str>,
        owner: NodeId,
    ) -> NameClaim {
        let (name, collided) = match requested.filter(|name| !name.is_empty()) {
            Some(name) if !self.is_taken(scope, name) => (name.to_owned(), false),
            Some(_) => (self.generate(scope, class_name), true),
            None => (self.generate(scope, class_name), false),
        };
        self.names.insert((scope, name.clone()), owner);
        NameClaim { name, collided }
    }

    /// Releases a name previously claimed by `owner`.
    ///
    /// Returns `false` if the name is not held by `owner`.
    pub fn release(&mut self, scope: TypeId, name: &str, owner: NodeId) -> bool {
        let key = (scope, name.to_owned());
        match self.names.get(&key) {
            Some(holder) if *holder == owner => {
                self.names.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Returns the node holding `name` in the given scope.
    pub fn lookup(&self, scope: TypeId, name: &str) -> Option<NodeId> {
        self.names.get(&(scope, name.to_owned())).copied()
    }

    /// Returns `true` if `name` is held by any node in the given scope.
    pub fn is_taken(&self, scope: TypeId, name: &str) -> bool {
        self.names.contains_key(&(scope, name.to_owned()))
    }

    /// Returns the number of names currently held.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no names are held.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn generate(&mut self, scope: TypeId, class_name: &str) -> String {
        let counter = self.counters.entry(scope).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{class_name}{counter}");
            if !self.names.contains_key(&(scope, candidate.clone())) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Button;
    struct Label;

    fn node(index: u32) -> NodeId {
        NodeId {
            index,
            generation: 0,
        }
    }

    #[test]
    fn test_claim_free_name() {
        let mut table = NameTable::new();
        let claim = table.claim(TypeId::of::<Button>(), "Button", Some("Ok"), node(0));

        assert_eq!(claim.name, "Ok");
        assert!(!claim.collided);
        assert_eq!(table.lookup(TypeId::of::<Button>(), "Ok"), Some(node(0)));
    }

    #[test]
    fn test_collision_generates_default() {
        let mut table = NameTable::new();
        table.claim(TypeId::of::<Button>(), "Button", Some("Ok"), node(0));
        let claim = table.claim(TypeId::of::<Button>(), "Button", Some("Ok"), node(1));

        assert!(claim.collided);
        assert_eq!(claim.name, "Button1");
        assert_eq!(table.lookup(TypeId::of::<Button>(), "Ok"), Some(node(0)));
    }

    #[test]
    fn test_generated_names_skip_taken_ones() {
        let mut table = NameTable::new();
        table.claim(TypeId::of::<Button>(), "Button", Some("Button1"), node(0));
        let claim = table.claim(TypeId::of::<Button>(), "Button", None, node(1));

        assert!(!claim.collided);
        assert_eq!(claim.name, "Button2");
    }

    #[test]
    fn test_scopes_are_independent() {
        let mut table = NameTable::new();
        table.claim(TypeId::of::<Button>(), "Button", Some("Title"), node(0));
        let claim = table.claim(TypeId::of::<Label>(), "Label", Some("Title"), node(1));

        assert!(!claim.collided);
        assert_eq!(claim.name, "Title");
    }

    #[test]
    fn test_release_requires_owner() {
        let mut table = NameTable::new();
        table.claim(TypeId::of::<Button>(), "Button", Some("Ok"), node(0));

        assert!(!table.release(TypeId::of::<Button>(), "Ok", node(1)));
        assert!(table.release(TypeId::of::<Button>(), "Ok", node(0)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_uid_is_unique() {
        assert_ne!(NodeUid::new(), NodeUid::new());
    }
}
