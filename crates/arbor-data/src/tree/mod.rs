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

//! The node tree: storage, lifecycle, identity and local properties.
//!
//! The tree is split across several files, each adding an `impl NodeTree` block:
//! - [`hierarchy`] parent/child links and child collection,
//! - [`cascade`] recomputation of world values,
//! - [`traits`] the per-node trait bag.
//!
//! Every mutating operation leaves all world values current before it returns.

mod cascade;
mod hierarchy;
mod record;
mod store;
mod traits;

use std::any::TypeId;

use arbor_core::{EventBus, NodeId, NodeUid, TreeConfig, TreeError, TreeEvent, WorldProperty};

pub(crate) use record::Cascaded;
pub use record::{NodeBuilder, NodeKind, NodeRecord};
use store::NodeStore;

use crate::registry::NodeRegistry;

/// The component tree.
///
/// Owns every node, the identity registry and the event bus on which every
/// completed mutation is reported.
pub struct NodeTree {
    pub(crate) store: NodeStore,
    pub(crate) registry: NodeRegistry,
    pub(crate) events: EventBus<TreeEvent>,
    pub(crate) config: TreeConfig,
    /// Pool of reusable node lists for traversals.
    pub(crate) scratch: Vec<Vec<NodeId>>,
}

impl NodeTree {
    /// Creates an empty tree.
    pub fn new(config: TreeConfig) -> Self {
        log::debug!("Creating node tree with {config:?}");
        Self {
            store: NodeStore::default(),
            registry: NodeRegistry::new(config.forbid_duplicate_index_entries),
            events: EventBus::new(),
            config,
            scratch: Vec::new(),
        }
    }

    /// The configuration the tree was created with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The bus on which tree events are published.
    pub fn events(&self) -> &EventBus<TreeEvent> {
        &self.events
    }

    /// The identity registry.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Returns the record of a live node.
    pub fn node(&self, node: NodeId) -> Option<&NodeRecord> {
        self.store.get(node)
    }

    /// Returns `true` if `node` refers to a live node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.store.contains(node)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the tree holds no node.
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Iterates over every live node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeRecord)> {
        self.store.iter()
    }

    /// Iterates over every node without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.store
            .iter()
            .filter(|(_, record)| record.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Creates a node, registers it and, if requested, attaches it to its parent.
    ///
    /// Fails without side effects if the behavior's class does not derive from the
    /// kind's base class, if the uid is taken, or if the parent rejects the node.
    pub fn spawn(&mut self, mut builder: NodeBuilder) -> Result<NodeId, TreeError> {
        let base = builder.kind.base_class();
        let class = match builder.behavior.as_ref() {
            Some(behavior) => {
                let class = behavior.class();
                if !class.is_subclass_of(base) {
                    return Err(TreeError::ClassMismatch {
                        class: class.name(),
                        expected: base.name(),
                    });
                }
                class
            }
            None => base,
        };
        let parent = builder.parent.take();
        if let Some(parent) = parent {
            if !self.store.contains(parent) {
                return Err(TreeError::NodeNotFound(parent));
            }
        }
        let requested = builder.name.take();
        let domain = builder
            .domain
            .take()
            .unwrap_or_else(|| self.config.default_domain.clone());

        let id = self.store.insert(builder.into_record(class, domain));
        let record = self.store.get(id).ok_or(TreeError::NodeNotFound(id))?;
        let claim = match self.registry.register(id, record, requested.as_deref()) {
            Ok(claim) => claim,
            Err(e) => {
                self.store.remove(id);
                return Err(e);
            }
        };
        if let Some(record) = self.store.get_mut(id) {
            record.name = claim.name.clone();
        }

        if let Some(parent) = parent {
            if let Err(e) = self.check_attach(id, parent) {
                if let Some(record) = self.store.remove(id) {
                    self.registry.unregister(id, &record);
                }
                return Err(e);
            }
        }

        log::debug!("Spawned node {id} '{}' of class {}.", claim.name, class.name());
        self.events.publish(TreeEvent::Spawned { node: id });
        if claim.collided {
            self.report_collision(id, requested.unwrap_or_default(), claim.name);
        }

        match parent {
            Some(parent) => {
                self.set_parent(id, Some(parent))?;
            }
            None => self.update_world_properties(id),
        }
        Ok(id)
    }

    /// Destroys a node.
    ///
    /// Focus held in the subtree is released, the node is detached from its parent,
    /// owned children are destroyed recursively and unowned children are detached
    /// and become roots.
    pub fn destroy(&mut self, node: NodeId) -> Result<(), TreeError> {
        let parent = self.record(node)?.parent;
        if let Some(leaf) = self.focused_leaf_within(node) {
            self.release_focus(leaf);
        }
        if let Some(parent) = parent {
            self.unlink(parent, node);
        }

        let children = self
            .store
            .get_mut(node)
            .map(|record| std::mem::take(&mut record.children))
            .unwrap_or_default();
        let (owned, unowned): (Vec<NodeId>, Vec<NodeId>) = children
            .into_iter()
            .filter(|child| self.store.contains(*child))
            .partition(|child| self.store.get(*child).is_some_and(|record| record.owned));

        for child in owned {
            self.detach_from_destroyed(node, child);
            self.destroy(child)?;
        }
        for child in unowned {
            self.detach_from_destroyed(node, child);
            self.events.publish(TreeEvent::ParentChanged {
                node: child,
                old: Some(node),
                new: None,
            });
            self.update_world_properties(child);
        }

        if let Some(record) = self.store.remove(node) {
            self.registry.unregister(node, &record);
            log::debug!("Destroyed node {node} '{}'.", record.name);
        }
        self.events.publish(TreeEvent::NodeDestroyed { node });
        Ok(())
    }

    /// Destroys every node of a domain. Returns the number of nodes destroyed,
    /// including owned children outside the domain.
    pub fn destroy_domain(&mut self, domain: &str) -> usize {
        let before = self.store.len();
        let members = self.registry.domain(domain).to_vec();
        for member in members {
            if self.store.contains(member) {
                if let Err(e) = self.destroy(member) {
                    log::error!("Failed to destroy node {member} of domain '{domain}': {e}");
                }
            }
        }
        let destroyed = before - self.store.len();
        log::debug!("Destroyed domain '{domain}' ({destroyed} nodes).");
        destroyed
    }

    /// Renames a node and returns the name actually assigned.
    ///
    /// A name taken by another node of the same class is replaced by a generated
    /// default and reported through `NameCollision`.
    pub fn rename(&mut self, node: NodeId, name: &str) -> Result<String, TreeError> {
        let record = self.store.get(node).ok_or(TreeError::NodeNotFound(node))?;
        if record.name == name {
            return Ok(record.name.clone());
        }
        let old = record.name.clone();
        let claim = self.registry.rename(node, record, name);
        if let Some(record) = self.store.get_mut(node) {
            record.name = claim.name.clone();
        }

        if claim.collided {
            self.report_collision(node, name.to_string(), claim.name.clone());
        }
        self.events.publish(TreeEvent::Renamed {
            node,
            old,
            new: claim.name.clone(),
        });
        Ok(claim.name)
    }

    /// Replaces the uid of a node. Fails if another node carries `uid`.
    pub fn reassign_uid(&mut self, node: NodeId, uid: NodeUid) -> Result<(), TreeError> {
        let old = self.record(node)?.uid;
        if old == uid {
            return Ok(());
        }
        self.registry.reassign_uid(node, old, uid)?;
        if let Some(record) = self.store.get_mut(node) {
            record.uid = uid;
        }
        Ok(())
    }

    /// Finds a node by name among nodes whose concrete class is `T`.
    pub fn find_by_name<T: ?Sized + 'static>(&self, name: &str) -> Option<NodeId> {
        self.registry.find_by_name::<T>(name)
    }

    /// Finds a node by uid.
    pub fn find_by_uid(&self, uid: NodeUid) -> Option<NodeId> {
        self.registry.find_by_uid(uid)
    }

    /// Every node assignable to `T` (a class marker or a `dyn` interface), in
    /// creation order.
    pub fn query_all<T: ?Sized + 'static>(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.registry.query_all::<T>().copied()
    }

    /// Returns `true` if `node` is assignable to `T`.
    pub fn is_a<T: ?Sized + 'static>(&self, node: NodeId) -> bool {
        self.store
            .get(node)
            .is_some_and(|record| self.registry.is_a(record.class, TypeId::of::<T>()))
    }

    /// Sets the local enabled state. Returns `Ok(false)` if unchanged.
    pub fn set_enabled(&mut self, node: NodeId, enabled: bool) -> Result<bool, TreeError> {
        self.set_local(node, WorldProperty::Enabled, enabled, |r| &mut r.enabled)
    }

    /// Sets the local visibility. Returns `Ok(false)` if unchanged.
    pub fn set_visible(&mut self, node: NodeId, visible: bool) -> Result<bool, TreeError> {
        self.set_local(node, WorldProperty::Visible, visible, |r| &mut r.visible)
    }

    /// Sets the local activity. Returns `Ok(false)` if unchanged.
    pub fn set_active(&mut self, node: NodeId, active: bool) -> Result<bool, TreeError> {
        self.set_local(node, WorldProperty::Active, active, |r| &mut r.active)
    }

    /// Sets the local z-order. Returns `Ok(false)` if unchanged.
    pub fn set_z_order(&mut self, node: NodeId, z_order: f32) -> Result<bool, TreeError> {
        self.set_local(node, WorldProperty::ZOrder, z_order, |r| &mut r.z_order)
    }

    /// Sets the sort key of the Update pass. Nothing cascades.
    pub fn set_update_order(&mut self, node: NodeId, update_order: i32) -> Result<(), TreeError> {
        self.record_mut(node)?.update_order = update_order;
        Ok(())
    }

    fn set_local<T: Copy + PartialEq>(
        &mut self,
        node: NodeId,
        property: WorldProperty,
        value: T,
        field: fn(&mut NodeRecord) -> &mut Cascaded<T>,
    ) -> Result<bool, TreeError> {
        let cascaded = field(self.record_mut(node)?);
        if cascaded.local == value {
            return Ok(false);
        }
        cascaded.local = value;
        self.events
            .publish(TreeEvent::PropertyChanged { node, property });
        self.update_world_property(node, property);
        Ok(true)
    }

    fn report_collision(&mut self, node: NodeId, requested: String, assigned: String) {
        log::warn!("Name '{requested}' is taken; node {node} was named '{assigned}' instead.");
        self.events.publish(TreeEvent::NameCollision {
            node,
            requested,
            assigned,
        });
    }

    fn detach_from_destroyed(&mut self, parent: NodeId, child: NodeId) {
        if let Some(record) = self.store.get_mut(child) {
            record.parent = None;
        }
        self.events
            .publish(TreeEvent::ChildRemoved { parent, child });
    }

    pub(crate) fn record(&self, node: NodeId) -> Result<&NodeRecord, TreeError> {
        self.store.get(node).ok_or(TreeError::NodeNotFound(node))
    }

    pub(crate) fn record_mut(&mut self, node: NodeId) -> Result<&mut NodeRecord, TreeError> {
        self.store
            .get_mut(node)
            .ok_or(TreeError::NodeNotFound(node))
    }

    pub(crate) fn take_scratch(&mut self) -> Vec<NodeId> {
        self.scratch.pop().unwrap_or_default()
    }

    pub(crate) fn return_scratch(&mut self, mut buffer: Vec<NodeId>) {
        buffer.clear();
        self.scratch.push(buffer);
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}
