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

//! Defines the core handle and enumeration types used to address nodes in the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A handle to a node stored in the tree arena.
///
/// It combines an index with a generation count to solve the "ABA problem".
/// When a node is destroyed, its slot can be recycled for a new node, but the
/// generation is incremented. Stale `NodeId`s pointing to a recycled slot no
/// longer resolve, so they can never reach the new node by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// The index of the node's slot in the arena.
    pub index: u32,
    /// A generation counter that is incremented each time the slot is recycled.
    pub generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// The cascaded properties of a node.
///
/// Every variant has a local value set by callers and a world value derived from
/// the local value and the parent's world value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldProperty {
    /// Whether the node takes part in the Update pass. Combined with AND.
    Enabled,
    /// Whether the node takes part in the Draw pass. Combined with AND.
    Visible,
    /// Whether the node is interactive. Combined with AND.
    Active,
    /// Draw ordering. Combined by addition.
    ZOrder,
    /// Spatial transform of transformable nodes. Combined by matrix composition.
    Transform,
}

impl WorldProperty {
    /// Every cascaded property, in the order a full recompute visits them.
    pub const ALL: [WorldProperty; 5] = [
        WorldProperty::Enabled,
        WorldProperty::Visible,
        WorldProperty::Active,
        WorldProperty::ZOrder,
        WorldProperty::Transform,
    ];
}

/// Traversal policy used when collecting children of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectMode {
    /// Direct children only.
    #[default]
    Shallow,
    /// Direct children that match; non-matching children are searched recursively
    /// instead. The search stops at the first match on every branch.
    ShallowDescending,
    /// Every matching descendant at any depth, recursing through matches as well.
    Descending,
}
