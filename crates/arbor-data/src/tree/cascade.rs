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

//! Recomputation of world values.
//!
//! `world = combine(local, parent.world)`, or `local` for roots:
//! - enabled, visible, active: logical AND,
//! - z-order: sum,
//! - transform: `anchor * local`, the anchor being the parent's scaled world
//!   matrix at the selected mount point.

use arbor_core::{NodeId, TreeEvent, WorldProperty};
use glam::Mat4;

use super::{NodeRecord, NodeTree};

/// World values a node inherits from its parent.
struct Inherited {
    enabled: bool,
    visible: bool,
    active: bool,
    z_order: f32,
    anchor: Option<Mat4>,
}

impl Inherited {
    const ROOT: Self = Self {
        enabled: true,
        visible: true,
        active: true,
        z_order: 0.0,
        anchor: None,
    };

    fn from_parent(parent: &NodeRecord, mount_point: Option<usize>) -> Self {
        Self {
            enabled: parent.enabled.world,
            visible: parent.visible.world,
            active: parent.active.world,
            z_order: parent.z_order.world,
            anchor: parent
                .transform
                .as_ref()
                .map(|transform| transform.anchor(mount_point)),
        }
    }
}

impl NodeTree {
    /// Recomputes one world property of `node` and then of every descendant.
    pub fn update_world_property(&mut self, node: NodeId, property: WorldProperty) {
        self.cascade(node, &[property]);
    }

    /// Recomputes every world property of `node` and then of every descendant.
    pub fn update_world_properties(&mut self, node: NodeId) {
        self.cascade(node, &WorldProperty::ALL);
    }

    fn cascade(&mut self, node: NodeId, properties: &[WorldProperty]) {
        let mut pending = self.take_scratch();
        pending.push(node);
        let mut visited = 0usize;

        // Parents are always popped before their children.
        while let Some(current) = pending.pop() {
            self.recompute(current, properties);
            if let Some(record) = self.store.get(current) {
                pending.extend(record.children.iter().rev());
            }
            visited += 1;
        }

        self.return_scratch(pending);
        log::trace!("Cascaded {properties:?} from node {node} over {visited} nodes.");
    }

    fn recompute(&mut self, node: NodeId, properties: &[WorldProperty]) {
        let Some(record) = self.store.get(node) else {
            return;
        };
        let mount_point = record.transform.as_ref().and_then(|t| t.mount_point);
        let inherited = record
            .parent
            .and_then(|parent| self.store.get(parent))
            .map_or(Inherited::ROOT, |parent| {
                Inherited::from_parent(parent, mount_point)
            });

        let Some(record) = self.store.get_mut(node) else {
            return;
        };
        let mut lost_interaction = false;
        for property in properties {
            match property {
                WorldProperty::Enabled => {
                    record.enabled.world = record.enabled.local && inherited.enabled;
                }
                WorldProperty::Visible => {
                    record.visible.world = record.visible.local && inherited.visible;
                    lost_interaction |= !record.visible.world;
                }
                WorldProperty::Active => {
                    record.active.world = record.active.local && inherited.active;
                    lost_interaction |= !record.active.world;
                }
                WorldProperty::ZOrder => {
                    record.z_order.world = record.z_order.local + inherited.z_order;
                }
                WorldProperty::Transform => {
                    if let Some(transform) = record.transform.as_mut() {
                        if let Some(bounds) = transform.apply_world(inherited.anchor) {
                            self.events
                                .publish(TreeEvent::BoundingBoxWorldChanged { node, bounds });
                        }
                    }
                }
            }
        }

        let focused = record
            .gui
            .as_ref()
            .is_some_and(|gui| gui.focus.is_focused());
        if lost_interaction && focused {
            log::debug!("Node {node} lost activity or visibility; releasing its focus.");
            self.release_focus(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeBuilder;

    #[test]
    fn test_enabled_end_to_end() {
        // --- ARRANGE ---
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::updateable().enabled(true)).unwrap();
        let child = tree
            .spawn(NodeBuilder::updateable().enabled(true).parent(root))
            .unwrap();
        assert!(tree.node(child).unwrap().enabled_world());

        // --- ACT & ASSERT ---
        tree.set_enabled(root, false).unwrap();
        let record = tree.node(child).unwrap();
        assert!(!record.enabled_world());
        assert!(record.enabled());

        tree.set_enabled(root, true).unwrap();
        assert!(tree.node(child).unwrap().enabled_world());
    }

    #[test]
    fn test_z_order_accumulates() {
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::component().z_order(1.0)).unwrap();
        let mid = tree
            .spawn(NodeBuilder::component().z_order(2.0).parent(root))
            .unwrap();
        let leaf = tree
            .spawn(NodeBuilder::component().z_order(0.5).parent(mid))
            .unwrap();

        assert_eq!(tree.node(leaf).unwrap().z_order_world(), 3.5);

        tree.set_z_order(root, -1.0).unwrap();
        assert_eq!(tree.node(leaf).unwrap().z_order_world(), 1.5);
    }

    #[test]
    fn test_detaching_restores_local_values() {
        let mut tree = NodeTree::default();
        let root = tree
            .spawn(NodeBuilder::component().visible(false).z_order(4.0))
            .unwrap();
        let child = tree.spawn(NodeBuilder::component().parent(root)).unwrap();
        assert!(!tree.node(child).unwrap().visible_world());

        tree.set_parent(child, None).unwrap();

        let record = tree.node(child).unwrap();
        assert!(record.visible_world());
        assert_eq!(record.z_order_world(), 0.0);
    }

    #[test]
    fn test_cascade_publishes_only_the_originating_change() {
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::component()).unwrap();
        for _ in 0..3 {
            tree.spawn(NodeBuilder::component().parent(root)).unwrap();
        }
        tree.events().drain();

        tree.set_active(root, false).unwrap();

        assert_eq!(
            tree.events().drain(),
            vec![TreeEvent::PropertyChanged {
                node: root,
                property: WorldProperty::Active
            }]
        );
    }
}
