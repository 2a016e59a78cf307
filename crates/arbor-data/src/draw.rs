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

//! The read-only Draw pass.
//!
//! The tree only decides which leaves are drawn and in which order. Turning them
//! into draw calls is the job of a [`DrawCollector`].

use arbor_core::{Aabb, NodeId};

use crate::tree::{NodeRecord, NodeTree};

/// Receives the ordered draw list of a frame.
pub trait DrawCollector {
    /// Called once per Draw pass with the visible leaves, back to front.
    fn collect(&mut self, tree: &NodeTree, nodes: &[NodeId]);
}

impl DrawCollector for Vec<NodeId> {
    fn collect(&mut self, _tree: &NodeTree, nodes: &[NodeId]) {
        self.clear();
        self.extend_from_slice(nodes);
    }
}

impl NodeTree {
    /// The visible leaves under `root` (inclusive), back to front.
    ///
    /// Leaves are sorted by world z-order; equal z keeps pre-order. When `view` is
    /// given, leaves whose world bounding box misses it are culled. Leaves without a
    /// valid box are never culled.
    pub fn draw_list(&self, root: NodeId, view: Option<&Aabb>) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            let Some(record) = self.store.get(node) else {
                continue;
            };
            if !record.visible.world {
                continue;
            }
            if record.children.is_empty() {
                if in_view(record, view) {
                    leaves.push((node, record.z_order.world));
                }
                continue;
            }
            stack.extend(record.children.iter().rev().copied());
        }

        leaves.sort_by(|a, b| a.1.total_cmp(&b.1));
        log::trace!("Draw list of {root}: {} leaf node(s).", leaves.len());
        leaves.into_iter().map(|(node, _)| node).collect()
    }

    /// Runs the Draw pass under `root` and hands the list to `collector`.
    pub fn draw(&self, root: NodeId, view: Option<&Aabb>, collector: &mut dyn DrawCollector) {
        let nodes = self.draw_list(root, view);
        collector.collect(self, &nodes);
    }
}

fn in_view(record: &NodeRecord, view: Option<&Aabb>) -> bool {
    let Some(view) = view else {
        return true;
    };
    match record.transform.as_ref().and_then(|t| t.bounds()) {
        Some(bounds) if bounds.world().is_valid() => bounds.world().intersects(view),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::glam::Vec3;

    use super::*;
    use crate::bounds::BoxBounds;
    use crate::transform::Transform;
    use crate::tree::NodeBuilder;

    #[test]
    fn test_draw_list_orders_leaves_by_world_z() {
        // --- ARRANGE ---
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::updateable()).unwrap();
        let back = tree
            .spawn(NodeBuilder::updateable().parent(root).z_order(-1.0))
            .unwrap();
        let group = tree
            .spawn(NodeBuilder::updateable().parent(root).z_order(2.0))
            .unwrap();
        let front = tree
            .spawn(NodeBuilder::updateable().parent(group).z_order(1.0))
            .unwrap();
        let middle_a = tree.spawn(NodeBuilder::updateable().parent(root)).unwrap();
        let middle_b = tree.spawn(NodeBuilder::updateable().parent(root)).unwrap();

        // --- ACT ---
        let list = tree.draw_list(root, None);

        // --- ASSERT ---
        assert_eq!(list, vec![back, middle_a, middle_b, front]);
    }

    #[test]
    fn test_hidden_branches_are_skipped() {
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::updateable()).unwrap();
        let hidden = tree.spawn(NodeBuilder::updateable().parent(root)).unwrap();
        tree.spawn(NodeBuilder::updateable().parent(hidden)).unwrap();
        let shown = tree.spawn(NodeBuilder::updateable().parent(root)).unwrap();
        tree.set_visible(hidden, false).unwrap();

        assert_eq!(tree.draw_list(root, None), vec![shown]);
    }

    #[test]
    fn test_view_culls_by_world_bounds() {
        let mut tree = NodeTree::default();
        let root = tree
            .spawn(NodeBuilder::transformable(Transform::IDENTITY))
            .unwrap();
        let unit = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        let near = tree
            .spawn(
                NodeBuilder::transformable(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
                    .parent(root)
                    .bounds(BoxBounds::new(unit)),
            )
            .unwrap();
        tree.spawn(
            NodeBuilder::transformable(Transform::from_position(Vec3::new(50.0, 0.0, 0.0)))
                .parent(root)
                .bounds(BoxBounds::new(unit)),
        )
        .unwrap();
        let unbounded = tree
            .spawn(NodeBuilder::transformable(Transform::IDENTITY).parent(root))
            .unwrap();
        let view = Aabb::from_min_max(Vec3::splat(-5.0), Vec3::splat(5.0));

        let mut collected = Vec::new();
        tree.draw(root, Some(&view), &mut collected);

        assert_eq!(collected, vec![near, unbounded]);
    }
}
