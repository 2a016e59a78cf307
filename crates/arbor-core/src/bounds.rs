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

//! The contract for bounding-volume maintenance of transformable nodes.

use std::any::Any;
use std::fmt::Debug;

use glam::Mat4;

use crate::geometry::Aabb;

/// A strategy computing the bounding box of a transformable node.
///
/// The tree owns one builder per node and re-anchors it whenever the node's
/// scaled local or world matrix changes. After `set_transform_world` the tree
/// compares [`world`](Self::world) with its previous value and publishes
/// `TreeEvent::BoundingBoxWorldChanged` when it differs.
pub trait BoundingBoxBuilder: Debug + 'static {
    /// The box in the node's own, untransformed space.
    fn source(&self) -> Aabb;

    /// The box in the parent's space.
    fn local(&self) -> Aabb;

    /// The box in world space.
    fn world(&self) -> Aabb;

    /// Re-anchors the local box on a new scaled local matrix.
    fn set_transform_local(&mut self, local: &Mat4);

    /// Re-anchors the world box on a new scaled world matrix.
    fn set_transform_world(&mut self, world: &Mat4);

    /// Allows downcasting to the concrete builder type.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to the concrete builder type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
