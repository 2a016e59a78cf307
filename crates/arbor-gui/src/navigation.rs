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

//! Directional and tab navigation between sibling GUI nodes.

use std::cmp::Ordering;

use arbor_core::{AbstractInput, CollectMode, Direction, FocusChannels, FocusError, NodeId, Rect};
use arbor_data::{GuiNode, NodeTree};

use crate::router::FocusRouter;

/// A navigation request resolved by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Move along a screen axis.
    Directional(Direction),
    /// Move through child order.
    Abstract(AbstractInput),
}

impl Navigation {
    /// Orders two rects along the navigation axis; ties fall back to the other axis.
    fn compare(self, a: &Rect, b: &Rect) -> Ordering {
        let by_x = a.origin.x.total_cmp(&b.origin.x);
        let by_y = a.origin.y.total_cmp(&b.origin.y);
        match self {
            Navigation::Directional(Direction::Right) => by_x.then(by_y),
            Navigation::Directional(Direction::Left) => by_x.reverse().then(by_y),
            Navigation::Directional(Direction::Down) => by_y.then(by_x),
            Navigation::Directional(Direction::Up) => by_y.reverse().then(by_x),
            Navigation::Abstract(_) => Ordering::Equal,
        }
    }
}

impl FocusRouter {
    /// Moves focus to the next eligible sibling of the focused leaf.
    ///
    /// Candidates are the GUI children of the leaf's container, which is the
    /// screen itself when nothing is focused. Returns the newly focused node, or
    /// `None` if no eligible candidate follows the current one.
    pub fn navigate(
        &mut self,
        tree: &mut NodeTree,
        navigation: Navigation,
    ) -> Result<Option<NodeId>, FocusError> {
        let screen = self.screen().ok_or(FocusError::NoScreen)?;
        let current = self.focused_leaf(tree);
        let container = current
            .filter(|leaf| *leaf != screen)
            .and_then(|leaf| tree.parent(leaf))
            .unwrap_or(screen);

        let candidates = self.candidates(tree, container, navigation);
        let start = current.and_then(|leaf| candidates.iter().position(|c| *c == leaf));
        let Some(next) = self.pick(tree, &candidates, start) else {
            log::trace!("No {navigation:?} candidate under container {container}.");
            return Ok(None);
        };

        self.focus(tree, next, FocusChannels::OTHER_INPUT)?;
        log::debug!("Navigated {navigation:?} to node {next}.");
        Ok(Some(next))
    }

    /// The GUI children of `container` in navigation order.
    fn candidates(
        &self,
        tree: &NodeTree,
        container: NodeId,
        navigation: Navigation,
    ) -> Vec<NodeId> {
        let mut candidates = Vec::new();
        tree.collect_children::<GuiNode>(
            container,
            CollectMode::Shallow,
            |_, _| true,
            &mut candidates,
        );
        match navigation {
            Navigation::Abstract(AbstractInput::Tab) => {}
            Navigation::Abstract(AbstractInput::ShiftTab) => candidates.reverse(),
            Navigation::Directional(_) => {
                let rect = |node: &NodeId| {
                    tree.gui(*node)
                        .map_or(Rect::default(), |gui| gui.rect())
                };
                candidates.sort_by(|a, b| navigation.compare(&rect(a), &rect(b)));
            }
        }
        candidates
    }

    /// The first eligible candidate after `start`, wrapping when configured.
    fn pick(
        &self,
        tree: &NodeTree,
        candidates: &[NodeId],
        start: Option<usize>,
    ) -> Option<NodeId> {
        let eligible = |node: &&NodeId| self.can_focus(tree, **node, FocusChannels::OTHER_INPUT);
        let (after, before) = match start {
            Some(index) => (&candidates[index + 1..], &candidates[..index]),
            None => (candidates, &[][..]),
        };
        let wrapped = if self.wraparound() { before } else { &[] };
        after.iter().chain(wrapped).find(eligible).copied()
    }
}
