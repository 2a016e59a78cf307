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

//! The focus state machine of one screen.

use arbor_core::{FocusChannels, FocusError, NodeId, TreeConfig};
use arbor_data::NodeTree;

/// Routes focus and input within the active screen.
///
/// The router holds no focus state itself; everything lives in the GUI facets of
/// the tree, so any number of routers may look at the same tree.
#[derive(Debug, Clone)]
pub struct FocusRouter {
    screen: Option<NodeId>,
    wraparound: bool,
}

impl FocusRouter {
    /// Creates a router without a screen.
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            screen: None,
            wraparound: config.focus_wraparound,
        }
    }

    /// Whether navigation wraps from the last candidate to the first.
    pub fn wraparound(&self) -> bool {
        self.wraparound
    }

    /// Turns navigation wraparound on or off.
    pub fn set_wraparound(&mut self, wraparound: bool) {
        self.wraparound = wraparound;
    }

    /// The active screen root.
    pub fn screen(&self) -> Option<NodeId> {
        self.screen
    }

    /// Makes `screen` the active screen, releasing focus held in the previous one.
    pub fn set_screen(
        &mut self,
        tree: &mut NodeTree,
        screen: Option<NodeId>,
    ) -> Result<(), FocusError> {
        if let Some(screen) = screen {
            if !tree.contains(screen) {
                return Err(FocusError::NodeNotFound(screen));
            }
            if tree.gui(screen).is_none() {
                return Err(FocusError::NotInteractive(screen));
            }
        }
        if let Some(previous) = self.screen.filter(|previous| Some(*previous) != screen) {
            tree.release_focus(previous);
        }
        log::debug!("Active screen: {:?} -> {screen:?}.", self.screen);
        self.screen = screen;
        Ok(())
    }

    /// Returns `true` if `node` may acquire focus through `channel`.
    ///
    /// The channel must be permitted, the node cumulatively active and visible, and
    /// the node must be the screen root or lie beneath it.
    pub fn can_focus(&self, tree: &NodeTree, node: NodeId, channel: FocusChannels) -> bool {
        let Some(screen) = self.screen else {
            return false;
        };
        let (Some(record), Some(gui)) = (tree.node(node), tree.gui(node)) else {
            return false;
        };
        gui.permits(channel)
            && record.active_world()
            && record.visible_world()
            && (node == screen || tree.is_ancestor_of(screen, node))
    }

    /// Gives focus to `node` through `channel`.
    ///
    /// Returns `Ok(false)` when the acquisition rule is not met. Otherwise the
    /// screen's current chain is released and a new one is linked down to `node`.
    pub fn focus(
        &mut self,
        tree: &mut NodeTree,
        node: NodeId,
        channel: FocusChannels,
    ) -> Result<bool, FocusError> {
        let screen = self.screen.ok_or(FocusError::NoScreen)?;
        if !tree.contains(node) {
            return Err(FocusError::NodeNotFound(node));
        }
        if tree.gui(node).is_none() {
            return Err(FocusError::NotInteractive(node));
        }
        if tree.is_focused(node) {
            return Err(FocusError::AlreadyFocused(node));
        }
        if !self.can_focus(tree, node, channel) {
            log::trace!("Node {node} cannot take focus through {channel:?}.");
            return Ok(false);
        }

        tree.release_focus(screen);
        tree.link_focus_chain(node, channel)?;
        Ok(true)
    }

    /// Removes focus from `node` if it is the focused leaf. Returns `false` otherwise.
    pub fn defocus(&mut self, tree: &mut NodeTree, node: NodeId) -> bool {
        tree.is_focused(node) && tree.release_focus(node)
    }

    /// The focused leaf of the active screen.
    pub fn focused_leaf(&self, tree: &NodeTree) -> Option<NodeId> {
        tree.focus_leaf(self.screen?)
    }

    /// Applies the modal containment rule to a pointer focus change towards `target`.
    ///
    /// With `M_A` the nearest modal ancestor-or-self of the focused leaf and `M_B`
    /// that of `target`, the change is allowed when nothing is focused, when `M_A`
    /// is none, when `M_A` is the parent of `target`, or when `M_A == M_B`.
    pub fn modal_allows(&self, tree: &NodeTree, target: NodeId) -> bool {
        let Some(current) = self.focused_leaf(tree) else {
            return true;
        };
        let Some(modal) = tree.nearest_modal(current) else {
            return true;
        };
        tree.parent(target) == Some(modal) || tree.nearest_modal(target) == Some(modal)
    }
}

impl Default for FocusRouter {
    fn default() -> Self {
        Self::new(&TreeConfig::default())
    }
}
