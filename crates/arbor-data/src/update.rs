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

//! The per-frame Update pass.

use arbor_core::{CollectMode, NodeId};

use crate::behavior::UpdateableNode;
use crate::tree::NodeTree;

impl NodeTree {
    /// Runs the Update pass on `node` and its updateable descendants.
    ///
    /// Children are snapshotted before they are visited, so hooks may reshape the
    /// tree freely. A child destroyed or disabled by an earlier sibling is skipped.
    pub fn update(&mut self, node: NodeId, dt: f32) {
        if !self.is_updating(node) {
            return;
        }
        self.with_behavior(node, |behavior, tree| behavior.on_update(tree, node, dt));

        let mut children = self.take_scratch();
        self.collect_children::<UpdateableNode>(
            node,
            CollectMode::Shallow,
            |_, _| true,
            &mut children,
        );
        if self.config.deterministic_update_order {
            let store = &self.store;
            children.sort_by_key(|child| store.get(*child).map_or(0, |r| r.update_order));
        }
        for &child in &children {
            if self.is_updating(child) {
                self.update(child, dt);
            }
        }
        self.return_scratch(children);
    }

    /// Runs the Update pass on every root node.
    pub fn update_roots(&mut self, dt: f32) {
        let mut roots = self.take_scratch();
        roots.extend(self.roots());
        log::trace!("Update pass over {} root(s).", roots.len());
        for &root in &roots {
            self.update(root, dt);
        }
        self.return_scratch(roots);
    }

    fn is_updating(&self, node: NodeId) -> bool {
        self.store
            .get(node)
            .is_some_and(|record| record.kind.is_updateable() && record.enabled.world)
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    use arbor_core::{ClassInfo, TreeConfig, TypeKey};

    use crate::behavior::{NodeBehavior, UPDATEABLE_NODE};
    use crate::tree::NodeBuilder;

    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Recorder {
        label: &'static str,
        log: Log,
        destroy_sibling: Option<NodeId>,
    }

    struct RecorderClass;
    static RECORDER: ClassInfo =
        ClassInfo::new("Recorder", TypeKey::of::<RecorderClass>).extends(&UPDATEABLE_NODE);

    impl NodeBehavior for Recorder {
        fn class(&self) -> &'static ClassInfo {
            &RECORDER
        }

        fn on_update(&mut self, tree: &mut NodeTree, _node: NodeId, _dt: f32) {
            self.log.borrow_mut().push(self.label);
            if let Some(sibling) = self.destroy_sibling.take() {
                tree.destroy(sibling).unwrap();
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn recorder(label: &'static str, log: &Log) -> Recorder {
        Recorder {
            label,
            log: log.clone(),
            destroy_sibling: None,
        }
    }

    #[test]
    fn test_update_visits_enabled_children_in_order() {
        // --- ARRANGE ---
        let log = Log::default();
        let mut tree = NodeTree::default();
        let root = tree
            .spawn(NodeBuilder::updateable().behavior(recorder("root", &log)))
            .unwrap();
        for label in ["a", "b", "c"] {
            tree.spawn(
                NodeBuilder::updateable()
                    .parent(root)
                    .behavior(recorder(label, &log)),
            )
            .unwrap();
        }
        let b = tree.children(root)[1];
        tree.set_enabled(b, false).unwrap();

        // --- ACT ---
        tree.update(root, 0.1);

        // --- ASSERT ---
        assert_eq!(*log.borrow(), vec!["root", "a", "c"]);
    }

    #[test]
    fn test_deterministic_order_sorts_by_update_order() {
        let log = Log::default();
        let config = TreeConfig {
            deterministic_update_order: true,
            ..TreeConfig::default()
        };
        let mut tree = NodeTree::new(config);
        let root = tree.spawn(NodeBuilder::updateable()).unwrap();
        for (label, order) in [("late", 5), ("early", -1), ("middle", 2)] {
            tree.spawn(
                NodeBuilder::updateable()
                    .parent(root)
                    .update_order(order)
                    .behavior(recorder(label, &log)),
            )
            .unwrap();
        }

        tree.update_roots(0.1);

        assert_eq!(*log.borrow(), vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_sibling_destroyed_during_pass_is_skipped() {
        let log = Log::default();
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::updateable()).unwrap();
        let first = tree
            .spawn(
                NodeBuilder::updateable()
                    .parent(root)
                    .behavior(recorder("first", &log)),
            )
            .unwrap();
        let second = tree
            .spawn(
                NodeBuilder::updateable()
                    .parent(root)
                    .behavior(recorder("second", &log)),
            )
            .unwrap();
        tree.behavior_mut::<Recorder>(first).unwrap().destroy_sibling = Some(second);

        tree.update(root, 0.1);

        assert_eq!(*log.borrow(), vec!["first"]);
        assert!(!tree.contains(second));
    }

    #[test]
    fn test_plain_components_are_not_updated_through() {
        let log = Log::default();
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::component()).unwrap();
        tree.spawn(
            NodeBuilder::updateable()
                .parent(root)
                .behavior(recorder("child", &log)),
        )
        .unwrap();

        tree.update(root, 0.1);

        assert!(log.borrow().is_empty());
    }
}
