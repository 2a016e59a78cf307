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

//! Node classes and the per-node behavior hooks.
//!
//! The four built-in classes form the hierarchy
//! `ComponentNode` <- `UpdateableNode` <- {`TransformableNode`, `GuiNode`}.
//! Subsystems declare their own classes by extending one of them:
//!
//! ```rust,ignore
//! pub struct Button;
//! pub static BUTTON: ClassInfo = ClassInfo::new("Button", TypeKey::of::<Button>)
//!     .extends(&GUI_NODE)
//!     .implements(&[TypeKey::of::<dyn Clickable>]);
//! ```

use std::any::Any;

use arbor_core::{ClassInfo, InputEvent, NodeId, TypeKey};

use crate::tree::NodeTree;

/// Marker type of the root class. Every node is a `ComponentNode`.
pub struct ComponentNode;
/// Marker type of nodes taking part in the Update pass.
pub struct UpdateableNode;
/// Marker type of nodes carrying a spatial transform.
pub struct TransformableNode;
/// Marker type of interactive nodes.
pub struct GuiNode;

/// The root class. The type index never files it; every node is assignable to it.
pub static COMPONENT_NODE: ClassInfo =
    ClassInfo::new("ComponentNode", TypeKey::of::<ComponentNode>);
/// The class of updateable nodes.
pub static UPDATEABLE_NODE: ClassInfo =
    ClassInfo::new("UpdateableNode", TypeKey::of::<UpdateableNode>).extends(&COMPONENT_NODE);
/// The class of transformable nodes.
pub static TRANSFORMABLE_NODE: ClassInfo =
    ClassInfo::new("TransformableNode", TypeKey::of::<TransformableNode>)
        .extends(&UPDATEABLE_NODE);
/// The class of GUI nodes.
pub static GUI_NODE: ClassInfo =
    ClassInfo::new("GuiNode", TypeKey::of::<GuiNode>).extends(&UPDATEABLE_NODE);

/// Per-node logic attached to a node of the tree.
///
/// While one of the `&mut self` hooks runs, the behavior is taken out of its node,
/// so the hook may freely mutate the tree through the `tree` argument. If the hook
/// destroys its own node, the behavior is dropped when the hook returns.
pub trait NodeBehavior: Any {
    /// The class of the node. It must derive from the base class of the node kind.
    fn class(&self) -> &'static ClassInfo;

    /// Called once per Update pass while the node is cumulatively enabled.
    fn on_update(&mut self, _tree: &mut NodeTree, _node: NodeId, _dt: f32) {}

    /// Lets a parent veto a child before it is attached.
    fn accepts_child(&self, _tree: &NodeTree, _node: NodeId, _child: NodeId) -> bool {
        true
    }

    /// Receives an input event routed to the node. Returns `true` if consumed.
    fn on_input(&mut self, _tree: &mut NodeTree, _node: NodeId, _event: &InputEvent) -> bool {
        false
    }

    /// Intercepts a navigation event before the router changes focus.
    ///
    /// A sunk event is delivered through [`on_input`](Self::on_input) instead.
    fn sink(&self, _tree: &NodeTree, _node: NodeId, _event: &InputEvent) -> bool {
        false
    }

    /// Downcast to a concrete type for type-specific operations.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to a concrete type (mutable) for type-specific operations.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl NodeTree {
    /// Runs `f` with the behavior of `node` taken out of its slot.
    ///
    /// While `f` runs, attaching children under `node` fails with
    /// [`TreeError::BehaviorBusy`](arbor_core::TreeError::BehaviorBusy).
    /// Returns `None` if the node does not exist or has no behavior.
    pub fn with_behavior<R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut dyn NodeBehavior, &mut NodeTree) -> R,
    ) -> Option<R> {
        let record = self.store.get_mut(node)?;
        let mut behavior = record.behavior.take()?;
        record.hook_running = true;
        let result = f(behavior.as_mut(), self);

        match self.store.get_mut(node) {
            Some(record) => {
                record.hook_running = false;
                if record.behavior.is_none() {
                    record.behavior = Some(behavior);
                } else {
                    log::warn!("Behavior of node {node} was replaced during its own hook.");
                }
            }
            None => log::trace!("Node {node} was destroyed by its own hook."),
        }
        Some(result)
    }

    /// Returns the behavior of `node` downcast to `B`.
    pub fn behavior<B: NodeBehavior>(&self, node: NodeId) -> Option<&B> {
        self.store
            .get(node)?
            .behavior
            .as_deref()?
            .as_any()
            .downcast_ref::<B>()
    }

    /// Returns the behavior of `node` mutably downcast to `B`.
    pub fn behavior_mut<B: NodeBehavior>(&mut self, node: NodeId) -> Option<&mut B> {
        self.store
            .get_mut(node)?
            .behavior
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<B>()
    }
}
