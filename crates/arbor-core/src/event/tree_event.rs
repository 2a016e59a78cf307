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

use crate::focus::FocusChannels;
use crate::geometry::Aabb;
use crate::node::{NodeId, WorldProperty};
use crate::trait_value::TraitValue;

/// A notification published by the tree after a mutation completed.
///
/// When a node is reparented the events arrive as `ChildRemoved` (old parent),
/// `ChildAdded` (new parent), then `ParentChanged`. World-value recomputation during
/// a cascade publishes nothing per node; only the originating local change is
/// reported through `PropertyChanged`.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    /// A node was created and registered.
    Spawned {
        /// The new node.
        node: NodeId,
    },
    /// A node was destroyed and its handle is no longer valid.
    NodeDestroyed {
        /// The destroyed node.
        node: NodeId,
    },
    /// A node's parent link changed.
    ParentChanged {
        /// The reparented node.
        node: NodeId,
        /// The previous parent, if any.
        old: Option<NodeId>,
        /// The new parent, if any.
        new: Option<NodeId>,
    },
    /// A child was attached to a parent.
    ChildAdded {
        /// The parent receiving the child.
        parent: NodeId,
        /// The attached child.
        child: NodeId,
    },
    /// A child was detached from a parent.
    ChildRemoved {
        /// The parent losing the child.
        parent: NodeId,
        /// The detached child.
        child: NodeId,
    },
    /// A local property value changed and its world value was recomputed.
    PropertyChanged {
        /// The node whose local value changed.
        node: NodeId,
        /// The property that changed.
        property: WorldProperty,
    },
    /// A node was renamed.
    Renamed {
        /// The renamed node.
        node: NodeId,
        /// The previous name.
        old: String,
        /// The name now in effect.
        new: String,
    },
    /// A requested name was taken and a generated default was assigned instead.
    NameCollision {
        /// The node that received the default name.
        node: NodeId,
        /// The name that was requested.
        requested: String,
        /// The generated name actually assigned.
        assigned: String,
    },
    /// A trait-bag value was set.
    TraitSet {
        /// The node owning the trait bag.
        node: NodeId,
        /// The trait key.
        key: String,
        /// The new value.
        value: TraitValue,
    },
    /// A node gained or lost focus.
    FocusChanged {
        /// The node whose focus channels changed.
        node: NodeId,
        /// The channels now set on the node. Empty when defocused.
        channels: FocusChannels,
    },
    /// The world-space bounding box of a transformable node changed.
    BoundingBoxWorldChanged {
        /// The node owning the bounding-box builder.
        node: NodeId,
        /// The new world-space box.
        bounds: Aabb,
    },
}

impl TreeEvent {
    /// Returns the node the event is primarily about.
    pub fn subject(&self) -> NodeId {
        match self {
            TreeEvent::Spawned { node }
            | TreeEvent::NodeDestroyed { node }
            | TreeEvent::ParentChanged { node, .. }
            | TreeEvent::PropertyChanged { node, .. }
            | TreeEvent::Renamed { node, .. }
            | TreeEvent::NameCollision { node, .. }
            | TreeEvent::TraitSet { node, .. }
            | TreeEvent::FocusChanged { node, .. }
            | TreeEvent::BoundingBoxWorldChanged { node, .. } => *node,
            TreeEvent::ChildAdded { child, .. } | TreeEvent::ChildRemoved { child, .. } => *child,
        }
    }
}
