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

use std::fmt;

use arbor_core::{BoundingBoxBuilder, ClassInfo, NodeId, NodeUid, TraitBag};
use glam::Mat4;

use crate::behavior::{
    NodeBehavior, COMPONENT_NODE, GUI_NODE, TRANSFORMABLE_NODE, UPDATEABLE_NODE,
};
use crate::gui::GuiState;
use crate::transform::{Transform, TransformState};

/// The built-in kind of a node, deciding which facets it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A plain node with no per-frame logic.
    Component,
    /// A node taking part in the Update pass.
    Updateable,
    /// An updateable node with a spatial transform.
    Transformable,
    /// An updateable, interactive node with a focus facet.
    Gui,
}

impl NodeKind {
    /// The class every node of this kind must derive from.
    pub fn base_class(self) -> &'static ClassInfo {
        match self {
            NodeKind::Component => &COMPONENT_NODE,
            NodeKind::Updateable => &UPDATEABLE_NODE,
            NodeKind::Transformable => &TRANSFORMABLE_NODE,
            NodeKind::Gui => &GUI_NODE,
        }
    }

    /// Returns `true` for every kind but `Component`.
    pub fn is_updateable(self) -> bool {
        !matches!(self, NodeKind::Component)
    }
}

/// A local value paired with its cumulative world value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cascaded<T: Copy> {
    pub(crate) local: T,
    pub(crate) world: T,
}

impl<T: Copy> Cascaded<T> {
    pub(crate) fn new(local: T) -> Self {
        Self {
            local,
            world: local,
        }
    }
}

/// Everything the tree stores about one node.
///
/// Records are only reachable through [`NodeTree::node`](crate::NodeTree::node);
/// every mutation goes through the tree so that world values and indexes stay current.
pub struct NodeRecord {
    pub(crate) uid: NodeUid,
    pub(crate) name: String,
    pub(crate) class: &'static ClassInfo,
    pub(crate) kind: NodeKind,
    pub(crate) domain: String,
    pub(crate) owned: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) enabled: Cascaded<bool>,
    pub(crate) visible: Cascaded<bool>,
    pub(crate) active: Cascaded<bool>,
    pub(crate) z_order: Cascaded<f32>,
    pub(crate) update_order: i32,
    pub(crate) traits: Option<TraitBag>,
    pub(crate) transform: Option<TransformState>,
    pub(crate) gui: Option<GuiState>,
    pub(crate) behavior: Option<Box<dyn NodeBehavior>>,
    /// Set while the behavior is taken out of its slot for a hook.
    pub(crate) hook_running: bool,
}

impl NodeRecord {
    /// The persistent unique id.
    pub fn uid(&self) -> NodeUid {
        self.uid
    }

    /// The name, unique among nodes of the same class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The concrete class.
    pub fn class(&self) -> &'static ClassInfo {
        self.class
    }

    /// The built-in kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The ownership domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Whether the node is destroyed together with its parent.
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// The parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The children, in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Local enabled state.
    pub fn enabled(&self) -> bool {
        self.enabled.local
    }

    /// Cumulative enabled state.
    pub fn enabled_world(&self) -> bool {
        self.enabled.world
    }

    /// Local visibility.
    pub fn visible(&self) -> bool {
        self.visible.local
    }

    /// Cumulative visibility.
    pub fn visible_world(&self) -> bool {
        self.visible.world
    }

    /// Local activity.
    pub fn active(&self) -> bool {
        self.active.local
    }

    /// Cumulative activity.
    pub fn active_world(&self) -> bool {
        self.active.world
    }

    /// Local z-order.
    pub fn z_order(&self) -> f32 {
        self.z_order.local
    }

    /// Cumulative z-order.
    pub fn z_order_world(&self) -> f32 {
        self.z_order.world
    }

    /// Sort key of the Update pass when deterministic ordering is configured.
    pub fn update_order(&self) -> i32 {
        self.update_order
    }

    /// The trait bag, if one was ever created.
    pub fn traits(&self) -> Option<&TraitBag> {
        self.traits.as_ref()
    }

    /// The transform facet of transformable nodes.
    pub fn transform(&self) -> Option<&TransformState> {
        self.transform.as_ref()
    }

    /// The focus facet of GUI nodes.
    pub fn gui(&self) -> Option<&GuiState> {
        self.gui.as_ref()
    }

    /// The attached behavior. `None` while one of its own hooks is running.
    pub fn behavior(&self) -> Option<&dyn NodeBehavior> {
        self.behavior.as_deref()
    }
}

impl fmt::Debug for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRecord")
            .field("name", &self.name)
            .field("class", &self.class.name())
            .field("kind", &self.kind)
            .field("domain", &self.domain)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("enabled", &self.enabled)
            .field("visible", &self.visible)
            .field("active", &self.active)
            .field("z_order", &self.z_order)
            .finish_non_exhaustive()
    }
}

/// Describes a node to spawn.
///
/// ```rust,ignore
/// let button = tree.spawn(
///     NodeBuilder::gui(Rect::new(0.0, 0.0, 80.0, 20.0))
///         .name("ok")
///         .parent(dialog)
///         .behavior(OkButton::default()),
/// )?;
/// ```
pub struct NodeBuilder {
    pub(crate) kind: NodeKind,
    pub(crate) name: Option<String>,
    pub(crate) domain: Option<String>,
    pub(crate) uid: Option<NodeUid>,
    pub(crate) behavior: Option<Box<dyn NodeBehavior>>,
    pub(crate) owned: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) enabled: bool,
    pub(crate) visible: bool,
    pub(crate) active: bool,
    pub(crate) z_order: f32,
    pub(crate) update_order: i32,
    pub(crate) traits: Option<TraitBag>,
    pub(crate) transform: Transform,
    pub(crate) mount_point: Option<usize>,
    pub(crate) mount_points: Vec<Mat4>,
    pub(crate) bounds: Option<Box<dyn BoundingBoxBuilder>>,
    pub(crate) gui: GuiState,
}

impl NodeBuilder {
    /// Starts describing a node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            domain: None,
            uid: None,
            behavior: None,
            owned: true,
            parent: None,
            enabled: true,
            visible: true,
            active: true,
            z_order: 0.0,
            update_order: 0,
            traits: None,
            transform: Transform::IDENTITY,
            mount_point: None,
            mount_points: Vec::new(),
            bounds: None,
            gui: GuiState::default(),
        }
    }

    /// A plain component node.
    pub fn component() -> Self {
        Self::new(NodeKind::Component)
    }

    /// An updateable node.
    pub fn updateable() -> Self {
        Self::new(NodeKind::Updateable)
    }

    /// A transformable node with the given local transform.
    pub fn transformable(transform: Transform) -> Self {
        Self::new(NodeKind::Transformable).transform(transform)
    }

    /// A GUI node occupying `rect` on screen.
    pub fn gui(rect: arbor_core::Rect) -> Self {
        let mut builder = Self::new(NodeKind::Gui);
        builder.gui.rect = rect;
        builder
    }

    /// Requests a name. A taken name is replaced by a generated one.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Places the node in a domain instead of the configured default.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Uses a known uid instead of generating one.
    pub fn uid(mut self, uid: NodeUid) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Attaches per-node logic. Its class decides how the node is indexed.
    pub fn behavior(mut self, behavior: impl NodeBehavior) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Whether the node is destroyed with its parent. Defaults to `true`.
    pub fn owned(mut self, owned: bool) -> Self {
        self.owned = owned;
        self
    }

    /// Attaches the node under `parent` as its last child.
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Initial local enabled state.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Initial local visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Initial local activity.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Initial local z-order.
    pub fn z_order(mut self, z_order: f32) -> Self {
        self.z_order = z_order;
        self
    }

    /// Sort key used when deterministic update ordering is configured.
    pub fn update_order(mut self, update_order: i32) -> Self {
        self.update_order = update_order;
        self
    }

    /// Initial trait bag.
    pub fn traits(mut self, traits: TraitBag) -> Self {
        self.traits = Some(traits);
        self
    }

    /// Local transform. Ignored unless the kind is `Transformable`.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// The parent mount point to attach to.
    pub fn mount_point(mut self, mount_point: usize) -> Self {
        self.mount_point = Some(mount_point);
        self
    }

    /// Anchors the node's own children may attach to.
    pub fn mount_points(mut self, mount_points: Vec<Mat4>) -> Self {
        self.mount_points = mount_points;
        self
    }

    /// Bounding-box builder of a transformable node.
    pub fn bounds(mut self, bounds: impl BoundingBoxBuilder) -> Self {
        self.bounds = Some(Box::new(bounds));
        self
    }

    /// Focus facet of a GUI node. Ignored unless the kind is `Gui`.
    pub fn gui_state(mut self, gui: GuiState) -> Self {
        self.gui = gui;
        self
    }

    pub(crate) fn into_record(self, class: &'static ClassInfo, domain: String) -> NodeRecord {
        let transform = (self.kind == NodeKind::Transformable).then(|| {
            let mut state = TransformState::new(self.transform);
            state.mount_point = self.mount_point;
            state.mount_points = self.mount_points;
            if let Some(bounds) = self.bounds {
                state.attach_bounds(bounds);
            }
            state
        });
        let gui = (self.kind == NodeKind::Gui).then_some(self.gui);

        NodeRecord {
            uid: self.uid.unwrap_or_default(),
            name: String::new(),
            class,
            kind: self.kind,
            domain,
            owned: self.owned,
            parent: None,
            children: Vec::new(),
            enabled: Cascaded::new(self.enabled),
            visible: Cascaded::new(self.visible),
            active: Cascaded::new(self.active),
            z_order: Cascaded::new(self.z_order),
            update_order: self.update_order,
            traits: self.traits,
            transform,
            gui,
            behavior: self.behavior,
            hook_running: false,
        }
    }
}
