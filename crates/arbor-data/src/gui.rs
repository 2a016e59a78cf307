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

//! The focus facet of GUI nodes and the chain primitives the router builds on.
//!
//! Focus is a chain: the focused leaf carries its channel and every GUI ancestor
//! points at the next node down through `focused_child`. A node *holds* focus when
//! it is the leaf or lies on a chain.

use arbor_core::{CollectMode, FocusChannels, FocusError, NodeId, Rect, TreeError, TreeEvent};

use crate::behavior::GuiNode;
use crate::tree::NodeTree;

/// Focus state and screen placement of a GUI node.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiState {
    pub(crate) permitted: FocusChannels,
    pub(crate) focus: FocusChannels,
    pub(crate) focused_child: Option<NodeId>,
    pub(crate) modal: bool,
    pub(crate) rect: Rect,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            permitted: FocusChannels::all(),
            focus: FocusChannels::empty(),
            focused_child: None,
            modal: false,
            rect: Rect::default(),
        }
    }
}

impl GuiState {
    /// A non-modal node at `rect` permitting every channel.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    /// Restricts the channels through which the node may be focused.
    pub fn with_permitted(mut self, permitted: FocusChannels) -> Self {
        self.permitted = permitted;
        self
    }

    /// Marks the node as modal.
    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// The channels through which the node may be focused.
    pub fn permitted(&self) -> FocusChannels {
        self.permitted
    }

    /// Returns `true` if every channel in `channel` is permitted.
    pub fn permits(&self, channel: FocusChannels) -> bool {
        self.permitted.contains(channel)
    }

    /// The channels currently set. Empty unless this node is the focused leaf.
    pub fn focus(&self) -> FocusChannels {
        self.focus
    }

    /// Returns `true` if this node is the focused leaf.
    pub fn is_focused(&self) -> bool {
        self.focus.is_focused()
    }

    /// The child the focus chain continues through.
    pub fn focused_child(&self) -> Option<NodeId> {
        self.focused_child
    }

    /// Whether the node is modal.
    pub fn is_modal(&self) -> bool {
        self.modal
    }

    /// The screen rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl NodeTree {
    /// The focus facet of a GUI node.
    pub fn gui(&self, node: NodeId) -> Option<&GuiState> {
        self.store.get(node)?.gui.as_ref()
    }

    /// Moves or resizes a GUI node.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> Result<(), TreeError> {
        self.gui_mut(node)?.rect = rect;
        Ok(())
    }

    /// Makes a GUI node modal or not.
    pub fn set_modal(&mut self, node: NodeId, modal: bool) -> Result<(), TreeError> {
        self.gui_mut(node)?.modal = modal;
        Ok(())
    }

    /// Changes the channels through which a GUI node may be focused.
    ///
    /// Current focus is kept; the mask only applies to future acquisitions.
    pub fn set_permitted(
        &mut self,
        node: NodeId,
        permitted: FocusChannels,
    ) -> Result<(), TreeError> {
        self.gui_mut(node)?.permitted = permitted;
        Ok(())
    }

    /// Returns `true` if `node` is the focused leaf.
    pub fn is_focused(&self, node: NodeId) -> bool {
        self.gui(node).is_some_and(GuiState::is_focused)
    }

    /// Returns `true` if `node` is the focused leaf or lies on a focus chain.
    pub fn holds_focus(&self, node: NodeId) -> bool {
        self.gui(node)
            .is_some_and(|gui| gui.is_focused() || gui.focused_child.is_some())
    }

    /// Follows the focus chain down from `node` to its focused leaf.
    pub fn focus_leaf(&self, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        loop {
            let gui = self.gui(current)?;
            if gui.is_focused() {
                return Some(current);
            }
            current = gui.focused_child?;
        }
    }

    /// The focused leaf among `node` and all of its descendants.
    ///
    /// Unlike [`focus_leaf`](Self::focus_leaf) this also finds chains that start
    /// below non-GUI nodes.
    pub fn focused_leaf_within(&self, node: NodeId) -> Option<NodeId> {
        if self.is_focused(node) {
            return Some(node);
        }
        let mut found = Vec::new();
        self.collect_children::<GuiNode>(
            node,
            CollectMode::Descending,
            |_, record| record.gui.as_ref().is_some_and(GuiState::is_focused),
            &mut found,
        );
        found.first().copied()
    }

    /// The nearest modal node among `node` and its ancestors.
    pub fn nearest_modal(&self, node: NodeId) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|candidate| self.gui(*candidate).is_some_and(GuiState::is_modal))
    }

    /// Releases the focus chain running through `node`.
    ///
    /// The leaf loses its channels and every chain pointer from the leaf up to the
    /// root is cleared. Returns `false` if `node` holds no focus.
    pub fn release_focus(&mut self, node: NodeId) -> bool {
        let Some(leaf) = self.focus_leaf(node) else {
            return false;
        };
        if let Some(gui) = self.store.get_mut(leaf).and_then(|r| r.gui.as_mut()) {
            gui.focus = FocusChannels::empty();
        }

        let mut current = leaf;
        while let Some(parent) = self.parent(current) {
            match self.store.get_mut(parent).and_then(|r| r.gui.as_mut()) {
                Some(gui) if gui.focused_child == Some(current) => gui.focused_child = None,
                _ => break,
            }
            current = parent;
        }

        log::debug!("Released focus of node {leaf}.");
        self.events.publish(TreeEvent::FocusChanged {
            node: leaf,
            channels: FocusChannels::empty(),
        });
        true
    }

    /// Makes `leaf` the focused node through `channel`, linking every GUI ancestor.
    ///
    /// Fails with `SplitFocus` if an ancestor is focused itself or already routes
    /// focus elsewhere; callers release the current chain first.
    pub fn link_focus_chain(
        &mut self,
        leaf: NodeId,
        channel: FocusChannels,
    ) -> Result<(), FocusError> {
        if !self.store.contains(leaf) {
            return Err(FocusError::NodeNotFound(leaf));
        }
        let gui = self.gui(leaf).ok_or(FocusError::NotInteractive(leaf))?;
        if gui.is_focused() {
            return Err(FocusError::AlreadyFocused(leaf));
        }
        if gui.focused_child.is_some() {
            return Err(FocusError::SplitFocus {
                node: leaf,
                at: leaf,
            });
        }

        let mut chain = self.take_scratch();
        let mut split = None;
        let mut below = leaf;
        for ancestor in self.ancestors(leaf) {
            let Some(gui) = self.gui(ancestor) else {
                break;
            };
            let diverges = gui.focused_child.is_some_and(|child| child != below);
            if gui.is_focused() || diverges {
                split = Some(ancestor);
                break;
            }
            chain.push(ancestor);
            below = ancestor;
        }
        if let Some(at) = split {
            self.return_scratch(chain);
            return Err(FocusError::SplitFocus { node: leaf, at });
        }

        let mut below = leaf;
        for &ancestor in &chain {
            if let Some(gui) = self.store.get_mut(ancestor).and_then(|r| r.gui.as_mut()) {
                gui.focused_child = Some(below);
            }
            below = ancestor;
        }
        self.return_scratch(chain);

        if let Some(gui) = self.store.get_mut(leaf).and_then(|r| r.gui.as_mut()) {
            gui.focus = channel;
        }
        log::debug!("Node {leaf} focused through {channel:?}.");
        self.events.publish(TreeEvent::FocusChanged {
            node: leaf,
            channels: channel,
        });
        Ok(())
    }

    fn gui_mut(&mut self, node: NodeId) -> Result<&mut GuiState, TreeError> {
        self.record_mut(node)?
            .gui
            .as_mut()
            .ok_or(TreeError::NotGui(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeBuilder;

    fn screen() -> (NodeTree, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::default();
        let root = tree.spawn(NodeBuilder::gui(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let panel = tree
            .spawn(NodeBuilder::gui(Rect::new(0.0, 0.0, 50.0, 50.0)).parent(root))
            .unwrap();
        let button = tree
            .spawn(NodeBuilder::gui(Rect::new(5.0, 5.0, 10.0, 10.0)).parent(panel))
            .unwrap();
        (tree, root, panel, button)
    }

    #[test]
    fn test_link_sets_pointers_up_to_root() {
        // --- ARRANGE ---
        let (mut tree, root, panel, button) = screen();

        // --- ACT ---
        tree.link_focus_chain(button, FocusChannels::NON_INPUT).unwrap();

        // --- ASSERT ---
        assert!(tree.is_focused(button));
        assert!(!tree.is_focused(panel));
        assert!(tree.holds_focus(root));
        assert_eq!(tree.gui(root).unwrap().focused_child(), Some(panel));
        assert_eq!(tree.gui(panel).unwrap().focused_child(), Some(button));
        assert_eq!(tree.focus_leaf(root), Some(button));
    }

    #[test]
    fn test_second_chain_is_a_split() {
        let (mut tree, root, panel, button) = screen();
        let other = tree
            .spawn(NodeBuilder::gui(Rect::default()).parent(root))
            .unwrap();
        tree.link_focus_chain(button, FocusChannels::POINTER).unwrap();

        let result = tree.link_focus_chain(other, FocusChannels::POINTER);

        assert_eq!(
            result,
            Err(FocusError::SplitFocus {
                node: other,
                at: root
            })
        );
        assert_eq!(tree.focus_leaf(panel), Some(button));
    }

    #[test]
    fn test_release_clears_whole_chain() {
        let (mut tree, root, panel, button) = screen();
        tree.link_focus_chain(button, FocusChannels::OTHER_INPUT).unwrap();
        tree.events().drain();

        assert!(tree.release_focus(root));

        assert!(!tree.holds_focus(root));
        assert!(!tree.holds_focus(panel));
        assert!(!tree.is_focused(button));
        assert_eq!(
            tree.events().drain(),
            vec![TreeEvent::FocusChanged {
                node: button,
                channels: FocusChannels::empty()
            }]
        );
        assert!(!tree.release_focus(root));
    }

    #[test]
    fn test_removing_focused_branch_releases_chain() {
        let (mut tree, root, panel, button) = screen();
        tree.link_focus_chain(button, FocusChannels::POINTER).unwrap();

        assert!(tree.remove_child(root, panel));

        assert!(!tree.holds_focus(root));
        assert!(!tree.is_focused(button));
    }

    #[test]
    fn test_hiding_focused_leaf_defocuses_it() {
        let (mut tree, root, panel, button) = screen();
        tree.link_focus_chain(button, FocusChannels::POINTER).unwrap();
        tree.events().drain();

        tree.set_visible(panel, false).unwrap();

        assert!(!tree.is_focused(button));
        assert!(!tree.holds_focus(root));
        assert_eq!(
            tree.events().drain(),
            vec![
                TreeEvent::PropertyChanged {
                    node: panel,
                    property: arbor_core::WorldProperty::Visible
                },
                TreeEvent::FocusChanged {
                    node: button,
                    channels: FocusChannels::empty()
                },
            ],
            "Only the focus loss is reported from inside the cascade"
        );
    }

    #[test]
    fn test_focused_root_cannot_be_attached() {
        let (mut tree, root, _, _) = screen();
        let loose = tree.spawn(NodeBuilder::gui(Rect::default())).unwrap();
        tree.link_focus_chain(loose, FocusChannels::NON_INPUT).unwrap();

        assert_eq!(
            tree.add_child(root, loose),
            Err(TreeError::FocusedAttach(loose))
        );
    }

    #[test]
    fn test_focus_below_plain_root_blocks_attach() {
        // --- ARRANGE ---
        let (mut tree, root, _, _) = screen();
        let holder = tree.spawn(NodeBuilder::updateable()).unwrap();
        let inner = tree
            .spawn(NodeBuilder::gui(Rect::default()).parent(holder))
            .unwrap();
        tree.link_focus_chain(inner, FocusChannels::POINTER).unwrap();
        let host = tree.spawn(NodeBuilder::updateable()).unwrap();

        // --- ACT ---
        let result = tree.add_child(host, holder);

        // --- ASSERT ---
        assert_eq!(tree.focused_leaf_within(holder), Some(inner));
        assert_eq!(result, Err(TreeError::FocusedAttach(holder)));
        assert_eq!(tree.parent(holder), None);
        assert!(tree.is_focused(inner));
        assert_eq!(tree.focused_leaf_within(root), None);
    }

    #[test]
    fn test_moving_branch_with_deep_focus_releases_it() {
        let mut tree = NodeTree::default();
        let old_home = tree.spawn(NodeBuilder::updateable()).unwrap();
        let branch = tree
            .spawn(NodeBuilder::updateable().parent(old_home))
            .unwrap();
        let panel = tree
            .spawn(NodeBuilder::gui(Rect::default()).parent(branch))
            .unwrap();
        let button = tree
            .spawn(NodeBuilder::gui(Rect::default()).parent(panel))
            .unwrap();
        tree.link_focus_chain(button, FocusChannels::OTHER_INPUT).unwrap();
        let new_home = tree.spawn(NodeBuilder::updateable()).unwrap();

        assert_eq!(tree.add_child(new_home, branch), Ok(true));

        assert!(!tree.is_focused(button));
        assert!(!tree.holds_focus(panel));
        assert_eq!(tree.focused_leaf_within(new_home), None);
    }

    #[test]
    fn test_nearest_modal() {
        let (mut tree, root, panel, button) = screen();
        tree.set_modal(panel, true).unwrap();

        assert_eq!(tree.nearest_modal(button), Some(panel));
        assert_eq!(tree.nearest_modal(panel), Some(panel));
        assert_eq!(tree.nearest_modal(root), None);
    }
}
