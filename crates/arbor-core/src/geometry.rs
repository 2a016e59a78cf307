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

//! Bounding volumes used for culling, bounding-box maintenance and hit testing.

use glam::{Mat4, Vec2, Vec3};

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// An AABB is a rectangular prism aligned with the coordinate axes, defined by its
/// minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// An invalid `Aabb` where `min` components are positive infinity and `max` are negative infinity.
    ///
    /// Merging any valid `Aabb` with `INVALID` yields that valid `Aabb`.
    pub const INVALID: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Creates a new `Aabb` from two corner points, in any order.
    #[inline]
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a new `Aabb` from a center point and its half-extents.
    ///
    /// Negative half-extents are made non-negative.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Creates an `Aabb` that tightly encloses a set of points.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::from_min_max(*first, *first), |aabb, point| {
            aabb.merged_with_point(*point)
        }))
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents of the `Aabb`.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Checks if the `Aabb` is valid (`min <= max` on all axes).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Checks if a point is contained within or on the boundary of the `Aabb`.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Checks if this `Aabb` overlaps another one. Touching boxes intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and another one.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and a point.
    #[inline]
    pub fn merged_with_point(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Computes the box enclosing this `Aabb` after an affine transformation.
    ///
    /// The center is transformed and the extents are projected onto the axes of
    /// the transformed space, which avoids transforming all eight corners.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        if !self.is_valid() {
            return *self;
        }
        let center = matrix.transform_point3(self.center());
        let half = self.half_extents();
        let half_extents = matrix.x_axis.truncate().abs() * half.x
            + matrix.y_axis.truncate().abs() * half.y
            + matrix.z_axis.truncate().abs() * half.z;
        Self::from_center_half_extents(center, half_extents)
    }
}

impl Default for Aabb {
    /// Returns [`Aabb::INVALID`].
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

/// A screen-space rectangle of a GUI node, `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// The top-left corner.
    pub origin: Vec2,
    /// Width and height. Never negative.
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }

    /// The bottom-right corner.
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// The center point.
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Returns `true` if `point` lies inside the rectangle or on its top/left edge.
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn test_aabb_from_min_max_orders_corners() {
        let aabb = Aabb::from_min_max(Vec3::new(4.0, 5.0, 6.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_aabb_from_points() {
        assert!(Aabb::from_points(&[]).is_none());

        let aabb = Aabb::from_points(&[
            Vec3::new(1.0, 5.0, -1.0),
            Vec3::new(0.0, 2.0, 3.0),
            Vec3::new(4.0, 8.0, 0.0),
        ])
        .unwrap();

        assert_eq!(aabb.min, Vec3::new(0.0, 2.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 8.0, 3.0));
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::splat(2.0));
        let touching = Aabb::from_min_max(Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 2.0, 2.0));
        let apart = Aabb::from_min_max(Vec3::new(2.1, 0.0, 0.0), Vec3::new(3.0, 2.0, 2.0));

        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert!(!Aabb::INVALID.is_valid());
    }

    #[test]
    fn test_aabb_transform() {
        let unit = Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0));

        let moved = unit.transform(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        assert_vec3_eq(moved.min, Vec3::new(9.0, -1.0, -1.0));
        assert_vec3_eq(moved.max, Vec3::new(11.0, 1.0, 1.0));

        let rotated = unit.transform(&Mat4::from_rotation_y(PI / 4.0));
        let sqrt2 = 2.0f32.sqrt();
        assert_vec3_eq(rotated.max, Vec3::new(sqrt2, 1.0, sqrt2));

        let scaled = unit.transform(&Mat4::from_scale(Vec3::new(2.0, 1.0, 0.5)));
        assert_vec3_eq(scaled.min, Vec3::new(-2.0, -1.0, -0.5));
    }

    #[test]
    fn test_invalid_aabb_survives_transform() {
        let moved = Aabb::INVALID.transform(&Mat4::from_translation(Vec3::ONE));
        assert!(!moved.is_valid());
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 10.0, 20.0, 5.0);

        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(29.9, 14.9)));
        assert!(!rect.contains(Vec2::new(30.0, 12.0)));
        assert_eq!(rect.center(), Vec2::new(20.0, 12.5));
    }
}
