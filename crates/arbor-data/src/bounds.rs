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

//! Built-in bounding-box builders.
//!
//! - [`BoxBounds`]: a fixed box.
//! - [`PrimitiveBounds`]: the box enclosing a sphere, cuboid or capsule.
//! - [`SourceBounds`]: the box enclosing the points of an arbitrary source.

use std::any::Any;
use std::fmt::Debug;

use arbor_core::{Aabb, BoundingBoxBuilder};
use glam::{Mat4, Vec3};

/// A source box carried through the local and world matrices of its node.
#[derive(Debug, Clone, Copy)]
struct Anchored {
    source: Aabb,
    local: Aabb,
    world: Aabb,
    local_matrix: Mat4,
    world_matrix: Mat4,
}

impl Anchored {
    fn new(source: Aabb) -> Self {
        Self {
            source,
            local: source,
            world: source,
            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
        }
    }

    fn set_source(&mut self, source: Aabb) {
        self.source = source;
        self.local = source.transform(&self.local_matrix);
        self.world = source.transform(&self.world_matrix);
    }

    fn set_local(&mut self, matrix: &Mat4) {
        self.local_matrix = *matrix;
        self.local = self.source.transform(matrix);
    }

    fn set_world(&mut self, matrix: &Mat4) {
        self.world_matrix = *matrix;
        self.world = self.source.transform(matrix);
    }
}

macro_rules! impl_anchored_builder {
    ($(<$param:ident: $bound:path>)? for $builder:ty) => {
        impl$(<$param: $bound>)? BoundingBoxBuilder for $builder {
            fn source(&self) -> Aabb {
                self.anchored.source
            }

            fn local(&self) -> Aabb {
                self.anchored.local
            }

            fn world(&self) -> Aabb {
                self.anchored.world
            }

            fn set_transform_local(&mut self, local: &Mat4) {
                self.anchored.set_local(local);
            }

            fn set_transform_world(&mut self, world: &Mat4) {
                self.anchored.set_world(world);
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

/// A fixed box in the node's own space.
#[derive(Debug, Clone)]
pub struct BoxBounds {
    anchored: Anchored,
}

impl BoxBounds {
    /// Creates a builder for a fixed box.
    pub fn new(source: Aabb) -> Self {
        Self {
            anchored: Anchored::new(source),
        }
    }

    /// Replaces the box.
    pub fn set_source(&mut self, source: Aabb) {
        self.anchored.set_source(source);
    }
}

impl_anchored_builder!(for BoxBounds);

/// A geometric primitive in the node's own space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// A sphere.
    Sphere {
        /// Center.
        center: Vec3,
        /// Radius.
        radius: f32,
    },
    /// A box given by center and half-extents.
    Cuboid {
        /// Center.
        center: Vec3,
        /// Half the size along each axis.
        half_extents: Vec3,
    },
    /// A capsule around the segment `start`..`end`.
    Capsule {
        /// One end of the axis segment.
        start: Vec3,
        /// The other end of the axis segment.
        end: Vec3,
        /// Radius around the segment.
        radius: f32,
    },
}

impl Primitive {
    /// The tightest axis-aligned box enclosing the primitive.
    pub fn aabb(&self) -> Aabb {
        match *self {
            Primitive::Sphere { center, radius } => {
                Aabb::from_center_half_extents(center, Vec3::splat(radius))
            }
            Primitive::Cuboid {
                center,
                half_extents,
            } => Aabb::from_center_half_extents(center, half_extents),
            Primitive::Capsule { start, end, radius } => {
                let radius = Vec3::splat(radius.abs());
                Aabb::from_min_max(start.min(end) - radius, start.max(end) + radius)
            }
        }
    }
}

/// The box enclosing a [`Primitive`].
#[derive(Debug, Clone)]
pub struct PrimitiveBounds {
    primitive: Primitive,
    anchored: Anchored,
}

impl PrimitiveBounds {
    /// Creates a builder for a primitive.
    pub fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            anchored: Anchored::new(primitive.aabb()),
        }
    }

    /// The primitive.
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Replaces the primitive.
    pub fn set_primitive(&mut self, primitive: Primitive) {
        self.primitive = primitive;
        self.anchored.set_source(primitive.aabb());
    }
}

impl_anchored_builder!(for PrimitiveBounds);

/// Anything that can list the points its bounding box must enclose.
pub trait BoundsSource: Debug + 'static {
    /// The points in the node's own space.
    fn points(&self) -> &[Vec3];
}

impl BoundsSource for Vec<Vec3> {
    fn points(&self) -> &[Vec3] {
        self
    }
}

/// The box enclosing the points of a [`BoundsSource`].
///
/// After mutating the source through [`source_mut`](Self::source_mut), call
/// [`refresh`](Self::refresh).
#[derive(Debug, Clone)]
pub struct SourceBounds<S: BoundsSource> {
    source: S,
    anchored: Anchored,
}

impl<S: BoundsSource> SourceBounds<S> {
    /// Creates a builder enclosing the points of `source`.
    pub fn new(source: S) -> Self {
        let aabb = Self::enclose(&source);
        Self {
            source,
            anchored: Anchored::new(aabb),
        }
    }

    /// The source.
    pub fn source_ref(&self) -> &S {
        &self.source
    }

    /// The source, mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Recomputes the box from the current points of the source.
    pub fn refresh(&mut self) {
        let aabb = Self::enclose(&self.source);
        self.anchored.set_source(aabb);
    }

    fn enclose(source: &S) -> Aabb {
        Aabb::from_points(source.points()).unwrap_or(Aabb::INVALID)
    }
}

impl_anchored_builder!(<S: BoundsSource> for SourceBounds<S>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_boxes() {
        let sphere = Primitive::Sphere {
            center: Vec3::new(1.0, 0.0, 0.0),
            radius: 2.0,
        };
        let capsule = Primitive::Capsule {
            start: Vec3::new(0.0, -1.0, 0.0),
            end: Vec3::new(0.0, 1.0, 0.0),
            radius: 0.5,
        };

        assert_eq!(
            sphere.aabb(),
            Aabb::from_min_max(Vec3::new(-1.0, -2.0, -2.0), Vec3::new(3.0, 2.0, 2.0))
        );
        assert_eq!(
            capsule.aabb(),
            Aabb::from_min_max(Vec3::new(-0.5, -1.5, -0.5), Vec3::new(0.5, 1.5, 0.5))
        );
    }

    #[test]
    fn test_box_is_reanchored_on_matrices() {
        // --- ARRANGE ---
        let mut bounds = BoxBounds::new(Aabb::from_min_max(Vec3::ZERO, Vec3::ONE));

        // --- ACT ---
        bounds.set_transform_local(&Mat4::from_scale(Vec3::splat(2.0)));
        bounds.set_transform_world(&Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)));

        // --- ASSERT ---
        assert_eq!(bounds.local().max, Vec3::splat(2.0));
        assert_eq!(bounds.world().min, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(bounds.source().max, Vec3::ONE);
    }

    #[test]
    fn test_source_bounds_refresh() {
        let mut bounds = SourceBounds::new(vec![Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)]);
        bounds.set_transform_world(&Mat4::from_translation(Vec3::X));

        bounds.source_mut().push(Vec3::new(-4.0, 0.0, 0.0));
        bounds.refresh();

        assert_eq!(bounds.world().min, Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(bounds.world().max, Vec3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn test_empty_source_yields_invalid_box() {
        let bounds = SourceBounds::new(Vec::<Vec3>::new());
        assert!(!bounds.world().is_valid());
    }
}
