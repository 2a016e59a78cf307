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

use std::any::TypeId;

use arbor_core::{CollectMode, NodeId, TreeError, TreeEvent};

use super::{NodeKind, NodeRecord, NodeTree};

impl NodeTree {
    /// The parent of `node`, if it is alive and attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.store.get(node)?.parent
    }

    /// The children of `node`, in order. Empty for dead nodes.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.store
            .get(node)
            .map_or(&[], |record| record.children.as_slice())
    }

    /// Iterates from the parent of `node` up to its root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |current| self.parent(*current))
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|current| current == ancestor)
    }

    /// The root of the tree containing `node`.
    pub fn root_of(&self, node: NodeId) -> Option<NodeId> {
        if !self.store.contains(node) {
            return None;
        }
        Some(self.ancestors(node).last().unwrap_or(node))
    }

    /// Number of ancestors of `node`.
    pub fn depth(&self, node: NodeId) -> usize {
        self.ancestors(node).count()
    }

    /// Moves `node` under `parent`, or detaches it when `parent` is `None`.
    ///
    /// Returns `Ok(false)` if the node already has that parent. Otherwise the node
    /// is detached (`ChildRemoved`, releasing any focus routed through it), attached
    /// as the last child (`ChildAdded`), `ParentChanged` is published and the world
    /// values of the whole subtree are recomputed.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<bool, TreeError> {
        self.reparent(node, parent, None)
    }

    /// Attaches `child` as the last child of `parent`. `Ok(false)` if it already is a child.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, TreeError> {
        if self.parent(child) == Some(parent) {
            return Ok(false);
        }
        self.set_parent(child, Some(parent))
    }

    /// Detaches `child` from `parent`. Returns `false` if it is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        matches!(self.set_parent(child, None), Ok(true))
    }

    /// Attaches `child` under `parent` at `index` (clamped to the child count).
    ///
    /// An existing child is moved to `index` instead.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<bool, TreeError> {
        if self.parent(child) == Some(parent) {
            return self.set_child_index(child, index);
        }
        self.reparent(child, Some(parent), Some(index))
    }

    /// Moves `child` to `index` among its siblings (clamped). `Ok(false)` if it has
    /// no parent or is already there.
    pub fn set_child_index(&mut self, child: NodeId, index: usize) -> Result<bool, TreeError> {
        let Some(parent) = self.record(child)?.parent else {
            return Ok(false);
        };
        let siblings = &mut self.record_mut(parent)?.children;
        let Some(current) = siblings.iter().position(|sibling| *sibling == child) else {
            return Ok(false);
        };
        let target = index.min(siblings.len() - 1);
        if current == target {
            return Ok(false);
        }
        let moved = siblings.remove(current);
        siblings.insert(target, moved);
        Ok(true)
    }

    /// Collects children of `node` assignable to `T` that satisfy `predicate`.
    ///
    /// - `Shallow`: direct children only.
    /// - `ShallowDescending`: matching direct children; non-matching children are
    ///   searched the same way, so each branch stops at its first match.
    /// - `Descending`: every matching descendant, recursing through matches too.
    ///
    /// Results are appended to `out` in pre-order.
    pub fn collect_children<T: ?Sized + 'static>(
        &self,
        node: NodeId,
        mode: CollectMode,
        mut predicate: impl FnMut(NodeId, &NodeRecord) -> bool,
        out: &mut Vec<NodeId>,
    ) {
        self.collect_matching(node, mode, TypeId::of::<T>(), &mut predicate, out);
    }

    fn collect_matching(
        &self,
        node: NodeId,
        mode: CollectMode,
        key: TypeId,
        predicate: &mut dyn FnMut(NodeId, &NodeRecord) -> bool,
        out: &mut Vec<NodeId>,
    ) {
        let Some(record) = self.store.get(node) else {
            return;
        };
        for &child in &record.children {
            let Some(child_record) = self.store.get(child) else {
                continue;
            };
            let matched =
                self.registry.is_a(child_record.class, key) && predicate(child, child_record);
            if matched {
                out.push(child);
            }
            let descend = match mode {
                CollectMode::Shallow => false,
                CollectMode::ShallowDescending => !matched,
                CollectMode::Descending => true,
            };
            if descend {
                self.collect_matching(child, mode, key, predicate, out);
            }
        }
    }

    /// Validates attaching `node` under `parent` without changing anything.
    pub(crate) fn check_attach(&self, node: NodeId, parent: NodeId) -> Result<(), TreeError> {
        let child_record = self.record(node)?;
        let parent_record = self.record(parent)?;
        if node == parent {
            return Err(TreeError::SelfParenting(node));
        }
        if self.is_ancestor_of(node, parent) {
            return Err(TreeError::Cycle { node, parent });
        }
        let incompatible = TreeError::IncompatibleChild {
            parent,
            child: node,
        };
        if !kinds_compatible(parent_record.kind, child_record.kind) {
            return Err(incompatible);
        }
        if parent_record.hook_running {
            return Err(TreeError::BehaviorBusy(parent));
        }
        if let Some(behavior) = parent_record.behavior.as_deref() {
            if !behavior.accepts_child(self, parent, node) {
                return Err(incompatible);
            }
        }
        if child_record.parent.is_none() && self.focused_leaf_within(node).is_some() {
            return Err(TreeError::FocusedAttach(node));
        }
        Ok(())
    }

    fn reparent(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        index: Option<usize>,
    ) -> Result<bool, TreeError> {
        let old = self.record(node)?.parent;
        if old == parent {
            return Ok(false);
        }
        if let Some(parent) = parent {
            self.check_attach(node, parent)?;
        }

        if let Some(old_parent) = old {
            if let Some(leaf) = self.focused_leaf_within(node) {
                self.release_focus(leaf);
            }
            self.unlink(old_parent, node);
        }
        if let Some(parent) = parent {
            self.link(parent, node, index);
        }
        self.events.publish(TreeEvent::ParentChanged {
            node,
            old,
            new: parent,
        });
        log::debug!("Reparented node {node}: {old:?} -> {parent:?}.");

        self.update_world_properties(node);
        Ok(true)
    }

    fn link(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        if let Some(record) = self.store.get_mut(parent) {
            let index = index.map_or(record.children.len(), |i| i.min(record.children.len()));
            record.children.insert(index, child);
        }
        if let Some(record) = self.store.get_mut(child) {
            record.parent = Some(parent);
        }
        self.events
            .publish(TreeEvent::ChildAdded { parent, child });
    }

    /// Removes `child` from the children of `parent` and clears its parent link.
    pub(crate) fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if let Some(record) = self.store.get_mut(parent) {
            record.children.retain(|c| *c != child);
        }
        if let Some(record) = self.store.get_mut(child) {
            record.parent = None;
        }
        self.events
            .publish(TreeEvent::ChildRemoved { parent, child });
    }
}

/// Transformable nodes only nest inside transformable nodes and vice versa;
/// GUI parents only take GUI children.
fn kinds_compatible(parent: NodeKind, child: NodeKind) -> bool {
    let parent_transformable = parent == NodeKind::Transformable;
    let child_transformable = child == NodeKind::Transformable;
    if parent_transformable != child_transformable {
        return false;
    }
    parent != NodeKind::Gui || child == NodeKind::Gui
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{GuiNode, UpdateableNode};
    use crate::transform::Transform;
    use crate::tree::NodeBuilder;
    use arbor_core::Rect;

    fn tree_with_chain() -> (NodeTree, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::default();
        let a = tree.spawn(NodeBuilder::updateable()).unwrap();
        let b = tree.spawn(NodeBuilder::updateable().parent(a)).unwrap();
        let c = tree.spawn(NodeBuilder::updateable().parent(b)).unwrap();
        (tree, a, b, c)
    }

    #[test]
    fn test_cycle_is_rejected_and_tree_unchanged() {
        // --- ARRANGE ---
        let (mut tree, a, b, c) = tree_with_chain();

        // --- ACT ---
        let result = tree.set_parent(a, Some(c));

        // --- ASSERT ---
        assert_eq!(result, Err(TreeError::Cycle { node: a, parent: c }));
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.children(c), &[] as &[NodeId]);
    }

    #[test]
    fn test_self_parenting_is_rejected() {
        let (mut tree, a, _, _) = tree_with_chain();
        assert_eq!(tree.set_parent(a, Some(a)), Err(TreeError::SelfParenting(a)));
    }

    #[test]
    fn test_reparent_to_same_parent_is_a_no_op() {
        let (mut tree, a, b, _) = tree_with_chain();
        tree.events().drain();

        assert_eq!(tree.set_parent(b, Some(a)), Ok(false));
        assert_eq!(tree.add_child(a, b), Ok(false));
        assert!(tree.events().is_empty());
    }

    #[test]
    fn test_reparent_event_order() {
        let (mut tree, a, b, c) = tree_with_chain();
        tree.events().drain();

        tree.set_parent(c, Some(a)).unwrap();

        assert_eq!(
            tree.events().drain(),
            vec![
                TreeEvent::ChildRemoved {
                    parent: b,
                    child: c
                },
                TreeEvent::ChildAdded {
                    parent: a,
                    child: c
                },
                TreeEvent::ParentChanged {
                    node: c,
                    old: Some(b),
                    new: Some(a)
                },
            ]
        );
        assert_eq!(tree.children(a), &[b, c]);
    }

    #[test]
    fn test_remove_absent_child_returns_false() {
        let (mut tree, a, _, c) = tree_with_chain();
        tree.events().drain();

        assert!(!tree.remove_child(a, c));
        assert_eq!(tree.depth(c), 2);
        assert!(tree.events().is_empty());
    }

    #[test]
    fn test_transformable_and_gui_type_rules() {
        let mut tree = NodeTree::default();
        let plain = tree.spawn(NodeBuilder::updateable()).unwrap();
        let spatial = tree
            .spawn(NodeBuilder::transformable(Transform::IDENTITY))
            .unwrap();
        let panel = tree.spawn(NodeBuilder::gui(Rect::default())).unwrap();
        let child_spatial = tree
            .spawn(NodeBuilder::transformable(Transform::IDENTITY))
            .unwrap();

        assert!(matches!(
            tree.add_child(plain, child_spatial),
            Err(TreeError::IncompatibleChild { .. })
        ));
        assert!(matches!(
            tree.add_child(spatial, plain),
            Err(TreeError::IncompatibleChild { .. })
        ));
        assert!(matches!(
            tree.add_child(panel, plain),
            Err(TreeError::IncompatibleChild { .. })
        ));
        assert_eq!(tree.add_child(spatial, child_spatial), Ok(true));
        assert_eq!(tree.add_child(plain, panel), Ok(true));
    }

    #[test]
    fn test_insert_child_and_set_child_index() {
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::updateable()).unwrap();
        let x = tree.spawn(NodeBuilder::updateable().parent(root)).unwrap();
        let y = tree.spawn(NodeBuilder::updateable().parent(root)).unwrap();
        let z = tree.spawn(NodeBuilder::updateable()).unwrap();

        tree.insert_child(root, z, 0).unwrap();
        assert_eq!(tree.children(root), &[z, x, y]);

        assert_eq!(tree.set_child_index(z, 99), Ok(true));
        assert_eq!(tree.children(root), &[x, y, z]);
        assert_eq!(tree.set_child_index(z, 2), Ok(false));
    }

    #[test]
    fn test_collect_children_modes() {
        // root
        // ├── g1 (gui)
        // │   └── g2 (gui)
        // └── u1 (updateable)
        //     └── g3 (gui)
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::updateable()).unwrap();
        let g1 = tree.spawn(NodeBuilder::gui(Rect::default()).parent(root)).unwrap();
        let g2 = tree.spawn(NodeBuilder::gui(Rect::default()).parent(g1)).unwrap();
        let u1 = tree.spawn(NodeBuilder::updateable().parent(root)).unwrap();
        let g3 = tree.spawn(NodeBuilder::gui(Rect::default()).parent(u1)).unwrap();

        let mut shallow = Vec::new();
        tree.collect_children::<GuiNode>(root, CollectMode::Shallow, |_, _| true, &mut shallow);
        let mut shallow_desc = Vec::new();
        tree.collect_children::<GuiNode>(
            root,
            CollectMode::ShallowDescending,
            |_, _| true,
            &mut shallow_desc,
        );
        let mut descending = Vec::new();
        tree.collect_children::<GuiNode>(root, CollectMode::Descending, |_, _| true, &mut descending);
        let mut updateables = Vec::new();
        tree.collect_children::<UpdateableNode>(
            root,
            CollectMode::Descending,
            |id, _| id != g2,
            &mut updateables,
        );

        assert_eq!(shallow, vec![g1]);
        assert_eq!(shallow_desc, vec![g1, g3]);
        assert_eq!(descending, vec![g1, g2, g3]);
        assert_eq!(updateables, vec![g1, u1, g3]);
    }

    #[test]
    fn test_root_of_and_ancestors() {
        let (tree, a, b, c) = tree_with_chain();

        assert_eq!(tree.root_of(c), Some(a));
        assert_eq!(tree.root_of(a), Some(a));
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![b, a]);
        assert!(tree.is_ancestor_of(a, c));
        assert!(!tree.is_ancestor_of(c, a));
    }
}
