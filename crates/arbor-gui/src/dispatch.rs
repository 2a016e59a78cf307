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

//! Input dispatch: pointer hit testing, the sink check and delivery to the focused leaf.

use arbor_core::glam::Vec2;
use arbor_core::{ButtonState, CollectMode, FocusChannels, FocusError, InputEvent, NodeId};
use arbor_data::{GuiNode, NodeTree};

use crate::navigation::Navigation;
use crate::router::FocusRouter;

/// What became of a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The focused leaf consumed the event.
    Consumed,
    /// The focused leaf sank a navigation event and received it.
    Sunk,
    /// The router moved focus in response to a navigation event.
    Navigated,
    /// A pointer press moved focus; the new leaf did not consume the press.
    FocusChanged,
    /// Nobody handled the event.
    Ignored,
}

impl FocusRouter {
    /// Routes one input event through the active screen.
    pub fn dispatch(
        &mut self,
        tree: &mut NodeTree,
        event: &InputEvent,
    ) -> Result<DispatchOutcome, FocusError> {
        if self.screen().is_none() {
            return Err(FocusError::NoScreen);
        }

        let navigation = match event {
            InputEvent::Navigate(direction) => Some(Navigation::Directional(*direction)),
            InputEvent::Abstract(input) => Some(Navigation::Abstract(*input)),
            _ => None,
        };
        if let Some(navigation) = navigation {
            return self.dispatch_navigation(tree, event, navigation);
        }

        let mut focus_changed = false;
        if let InputEvent::PointerButton {
            state: ButtonState::Down,
            position,
            ..
        } = event
        {
            focus_changed = self.focus_under_pointer(tree, *position)?;
        }

        let consumed = self
            .focused_leaf(tree)
            .is_some_and(|leaf| deliver(tree, leaf, event));
        Ok(match (consumed, focus_changed) {
            (true, _) => DispatchOutcome::Consumed,
            (false, true) => DispatchOutcome::FocusChanged,
            (false, false) => DispatchOutcome::Ignored,
        })
    }

    /// The topmost active, visible GUI node under the screen containing `point`.
    ///
    /// Higher world z-order wins; among equal z the node later in pre-order wins.
    pub fn hit_test(&self, tree: &NodeTree, point: Vec2) -> Option<NodeId> {
        let screen = self.screen()?;
        let mut hits = Vec::new();
        tree.collect_children::<GuiNode>(
            screen,
            CollectMode::Descending,
            |node, record| {
                record.active_world()
                    && record.visible_world()
                    && tree.gui(node).is_some_and(|gui| gui.rect().contains(point))
            },
            &mut hits,
        );

        let z = |node: NodeId| tree.node(node).map_or(f32::MIN, |r| r.z_order_world());
        hits.into_iter()
            .reduce(|top, node| if z(node) >= z(top) { node } else { top })
    }

    fn dispatch_navigation(
        &mut self,
        tree: &mut NodeTree,
        event: &InputEvent,
        navigation: Navigation,
    ) -> Result<DispatchOutcome, FocusError> {
        if let Some(leaf) = self.focused_leaf(tree) {
            let sunk = tree
                .node(leaf)
                .and_then(|record| record.behavior())
                .is_some_and(|behavior| behavior.sink(tree, leaf, event));
            if sunk {
                log::trace!("Node {leaf} sank {event:?}.");
                deliver(tree, leaf, event);
                return Ok(DispatchOutcome::Sunk);
            }
        }

        Ok(match self.navigate(tree, navigation)? {
            Some(_) => DispatchOutcome::Navigated,
            None => DispatchOutcome::Ignored,
        })
    }

    /// Moves pointer focus to the node under `position`, subject to the modal rule.
    fn focus_under_pointer(
        &mut self,
        tree: &mut NodeTree,
        position: Vec2,
    ) -> Result<bool, FocusError> {
        let Some(target) = self.hit_test(tree, position) else {
            return Ok(false);
        };
        if tree.is_focused(target) {
            return Ok(false);
        }
        if !self.modal_allows(tree, target) {
            log::debug!("Pointer focus to node {target} blocked by a modal node.");
            return Ok(false);
        }
        self.focus(tree, target, FocusChannels::POINTER)
    }
}

/// Hands `event` to the behavior of `leaf`. Returns `true` if it was consumed.
fn deliver(tree: &mut NodeTree, leaf: NodeId, event: &InputEvent) -> bool {
    tree.with_behavior(leaf, |behavior, tree| behavior.on_input(tree, leaf, event))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::{Direction, Rect};
    use arbor_data::NodeBuilder;

    #[test]
    fn test_hit_test_prefers_higher_z_then_later_node() {
        // --- ARRANGE ---
        let mut tree = NodeTree::default();
        let screen = tree
            .spawn(NodeBuilder::gui(Rect::new(0.0, 0.0, 100.0, 100.0)))
            .unwrap();
        let raised = tree
            .spawn(
                NodeBuilder::gui(Rect::new(0.0, 0.0, 50.0, 50.0))
                    .parent(screen)
                    .z_order(1.0),
            )
            .unwrap();
        let first = tree
            .spawn(NodeBuilder::gui(Rect::new(40.0, 40.0, 50.0, 50.0)).parent(screen))
            .unwrap();
        let second = tree
            .spawn(NodeBuilder::gui(Rect::new(40.0, 40.0, 50.0, 50.0)).parent(screen))
            .unwrap();
        let mut router = FocusRouter::default();
        router.set_screen(&mut tree, Some(screen)).unwrap();

        // --- ACT & ASSERT ---
        assert_eq!(router.hit_test(&tree, Vec2::new(45.0, 45.0)), Some(raised));
        assert_eq!(router.hit_test(&tree, Vec2::new(80.0, 80.0)), Some(second));
        tree.set_visible(second, false).unwrap();
        assert_eq!(router.hit_test(&tree, Vec2::new(80.0, 80.0)), Some(first));
        assert_eq!(router.hit_test(&tree, Vec2::new(95.0, 5.0)), None);
    }

    #[test]
    fn test_navigation_without_focus_picks_first_candidate() {
        let mut tree = NodeTree::default();
        let screen = tree.spawn(NodeBuilder::gui(Rect::default())).unwrap();
        let only = tree
            .spawn(NodeBuilder::gui(Rect::default()).parent(screen))
            .unwrap();
        let mut router = FocusRouter::default();
        router.set_screen(&mut tree, Some(screen)).unwrap();

        let outcome = router.dispatch(&mut tree, &InputEvent::Navigate(Direction::Down));

        assert_eq!(outcome, Ok(DispatchOutcome::Navigated));
        assert!(tree.is_focused(only));
    }

    #[test]
    fn test_dispatch_needs_a_screen() {
        let mut tree = NodeTree::default();
        let mut router = FocusRouter::default();

        let outcome = router.dispatch(&mut tree, &InputEvent::Wheel { delta: Vec2::Y });

        assert_eq!(outcome, Err(FocusError::NoScreen));
    }
}
