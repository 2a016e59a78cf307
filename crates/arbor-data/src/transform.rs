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

//! Spatial transforms of transformable nodes, mount points and bounding boxes.

use arbor_core::{Aabb, BoundingBoxBuilder, NodeId, TreeError, TreeEvent, WorldProperty};
use glam::{Mat4, Vec3};

use crate::tree::NodeTree;

/// The local transform of a node, relative to its parent's anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Non-uniform scale, applied before the orientation.
    pub scale: Vec3,
    /// Rotation, as a matrix.
    pub orientation: Mat4,
}

impl Transform {
    /// No translation, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        scale: Vec3::ONE,
        orientation: Mat4::IDENTITY,
    };

    /// A pure translation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Returns a copy with a different scale.
    pub fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    /// Returns a copy with a different orientation.
    pub fn with_orientation(self, orientation: Mat4) -> Self {
        Self {
            orientation,
            ..self
        }
    }

    /// `T * R`.
    pub fn unscaled_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * self.orientation
    }

    /// `T * R * S`.
    pub fn scaled_matrix(&self) -> Mat4 {
        self.unscaled_matrix() * Mat4::from_scale(self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The transform facet of a transformable node: its local transform, the derived
/// matrices, its mount points and its bounding-box builder.
#[derive(Debug)]
pub struct TransformState {
    pub(crate) local: Transform,
    pub(crate) local_unscaled: Mat4,
    pub(crate) local_scaled: Mat4,
    pub(crate) world_unscaled: Mat4,
    pub(crate) world_scaled: Mat4,
    /// The mount point of the parent this node is attached to.
    pub(crate) mount_point: Option<usize>,
    /// Anchors offered to this node's children, relative to its scaled world matrix.
    pub(crate) mount_points: Vec<Mat4>,
    pub(crate) bounds: Option<Box<dyn BoundingBoxBuilder>>,
}

impl TransformState {
    pub(crate) fn new(local: Transform) -> Self {
        let local_unscaled = local.unscaled_matrix();
        let local_scaled = local.scaled_matrix();
        Self {
            local,
            local_unscaled,
            local_scaled,
            world_unscaled: local_unscaled,
            world_scaled: local_scaled,
            mount_point: None,
            mount_points: Vec::new(),
            bounds: None,
        }
    }

    /// The local transform.
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// `T * R` of the local transform.
    pub fn local_unscaled(&self) -> Mat4 {
        self.local_unscaled
    }

    /// `T * R * S` of the local transform.
    pub fn local_scaled(&self) -> Mat4 {
        self.local_scaled
    }

    /// The world matrix without this node's own scale.
    pub fn world_unscaled(&self) -> Mat4 {
        self.world_unscaled
    }

    /// The world matrix including this node's own scale.
    pub fn world_scaled(&self) -> Mat4 {
        self.world_scaled
    }

    /// The world-space position of the node's origin.
    pub fn world_position(&self) -> Vec3 {
        self.world_scaled.w_axis.truncate()
    }

    /// The parent mount point this node attaches to.
    pub fn mount_point(&self) -> Option<usize> {
        self.mount_point
    }

    /// The anchors children of this node may attach to.
    pub fn mount_points(&self) -> &[Mat4] {
        &self.mount_points
    }

    /// The bounding-box builder.
    pub fn bounds(&self) -> Option<&dyn BoundingBoxBuilder> {
        self.bounds.as_deref()
    }

    /// The matrix a child attached at `mount_point` composes with.
    ///
    /// An absent or out-of-range index falls back to the node's own origin.
    pub(crate) fn anchor(&self, mount_point: Option<usize>) -> Mat4 {
        match mount_point {
            Some(index) => match self.mount_points.get(index) {
                Some(mount) => self.world_scaled * *mount,
                None => {
                    log::warn!(
                        "Mount point {index} out of range ({} available); using the origin.",
                        self.mount_points.len()
                    );
                    self.world_scaled
                }
            },
            None => self.world_scaled,
        }
    }

    pub(crate) fn set_local(&mut self, local: Transform) {
        self.local = local;
        self.local_unscaled = local.unscaled_matrix();
        self.local_scaled = local.scaled_matrix();
        if let Some(bounds) = self.bounds.as_mut() {
            bounds.set_transform_local(&self.local_scaled);
        }
    }

    /// Recomputes the world matrices. Returns the new world box if it changed.
    pub(crate) fn apply_world(&mut self, anchor: Option<Mat4>) -> Option<Aabb> {
        let (world_unscaled, world_scaled) = match anchor {
            Some(anchor) => (anchor * self.local_unscaled, anchor * self.local_scaled),
            None => (self.local_unscaled, self.local_scaled),
        };
        self.world_unscaled = world_unscaled;
        self.world_scaled = world_scaled;
        self.reanchor_world()
    }

    /// Installs a builder and anchors it on the current matrices.
    pub(crate) fn attach_bounds(&mut self, bounds: Box<dyn BoundingBoxBuilder>) -> Option<Aabb> {
        self.bounds = Some(bounds);
        if let Some(bounds) = self.bounds.as_mut() {
            bounds.set_transform_local(&self.local_scaled);
        }
        self.reanchor_world().or_else(|| self.bounds().map(|b| b.world()))
    }

    fn reanchor_world(&mut self) -> Option<Aabb> {
        let bounds = self.bounds.as_mut()?;
        let before = bounds.world();
        bounds.set_transform_world(&self.world_scaled);
        let after = bounds.world();
        (after != before).then_some(after)
    }
}

impl NodeTree {
    /// Replaces the local transform and cascades the world matrices.
    ///
    /// Returns `Ok(false)` if unchanged.
    pub fn set_transform(&mut self, node: NodeId, transform: Transform) -> Result<bool, TreeError> {
        let state = self.transform_mut(node)?;
        if state.local == transform {
            return Ok(false);
        }
        state.set_local(transform);
        self.events.publish(TreeEvent::PropertyChanged {
            node,
            property: WorldProperty::Transform,
        });
        self.update_world_property(node, WorldProperty::Transform);
        Ok(true)
    }

    /// Sets the local position.
    pub fn set_position(&mut self, node: NodeId, position: Vec3) -> Result<bool, TreeError> {
        let local = self.transform_mut(node)?.local;
        self.set_transform(node, Transform { position, ..local })
    }

    /// Sets the local scale.
    pub fn set_scale(&mut self, node: NodeId, scale: Vec3) -> Result<bool, TreeError> {
        let local = self.transform_mut(node)?.local;
        self.set_transform(node, local.with_scale(scale))
    }

    /// Sets the local orientation.
    pub fn set_orientation(&mut self, node: NodeId, orientation: Mat4) -> Result<bool, TreeError> {
        let local = self.transform_mut(node)?.local;
        self.set_transform(node, local.with_orientation(orientation))
    }

    /// Selects the parent mount point the node attaches to.
    pub fn set_mount_point(
        &mut self,
        node: NodeId,
        mount_point: Option<usize>,
    ) -> Result<bool, TreeError> {
        let state = self.transform_mut(node)?;
        if state.mount_point == mount_point {
            return Ok(false);
        }
        state.mount_point = mount_point;
        self.update_world_property(node, WorldProperty::Transform);
        Ok(true)
    }

    /// Replaces the anchors offered to the node's children and re-cascades them.
    pub fn set_mount_points(&mut self, node: NodeId, mount_points: Vec<Mat4>) -> Result<(), TreeError> {
        self.transform_mut(node)?.mount_points = mount_points;
        self.update_world_property(node, WorldProperty::Transform);
        Ok(())
    }

    /// Installs a bounding-box builder and publishes its initial world box.
    pub fn set_bounds(
        &mut self,
        node: NodeId,
        bounds: impl BoundingBoxBuilder,
    ) -> Result<(), TreeError> {
        if let Some(world) = self.transform_mut(node)?.attach_bounds(Box::new(bounds)) {
            self.events.publish(TreeEvent::BoundingBoxWorldChanged {
                node,
                bounds: world,
            });
        }
        Ok(())
    }

    /// Returns the bounding-box builder of `node` downcast to `B`.
    pub fn bounds<B: BoundingBoxBuilder>(&self, node: NodeId) -> Option<&B> {
        self.store
            .get(node)?
            .transform
            .as_ref()?
            .bounds
            .as_deref()?
            .as_any()
            .downcast_ref::<B>()
    }

    /// Mutates the bounding-box builder of `node`, then re-anchors it.
    ///
    /// Returns `Ok(None)` if the node has no builder of type `B`.
    pub fn update_bounds<B: BoundingBoxBuilder, R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut B) -> R,
    ) -> Result<Option<R>, TreeError> {
        let state = self.transform_mut(node)?;
        let local = state.local_scaled;
        let Some(builder) = state
            .bounds
            .as_deref_mut()
            .and_then(|bounds| bounds.as_any_mut().downcast_mut::<B>())
        else {
            return Ok(None);
        };
        let result = f(builder);
        builder.set_transform_local(&local);
        if let Some(world) = state.reanchor_world() {
            self.events.publish(TreeEvent::BoundingBoxWorldChanged {
                node,
                bounds: world,
            });
        }
        Ok(Some(result))
    }

    /// The scaled world matrix of a transformable node.
    pub fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        Some(self.store.get(node)?.transform.as_ref()?.world_scaled)
    }

    fn transform_mut(&mut self, node: NodeId) -> Result<&mut TransformState, TreeError> {
        self.record_mut(node)?
            .transform
            .as_mut()
            .ok_or(TreeError::NotTransformable(node))
    }
}
