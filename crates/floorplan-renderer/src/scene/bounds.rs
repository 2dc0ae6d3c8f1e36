//! Axis-aligned bounding boxes.

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any union replaces.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The 8 corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// World-space AABB enclosing the transformed corners
    pub fn transform(&self, transform: &Mat4) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        let corners = self.corners().map(|c| transform.transform_point3(c));
        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min = min.min(*corner);
            max = max.max(*corner);
        }
        BoundingBox { min, max }
    }

    /// Ray-AABB slab test.
    ///
    /// Returns the distance to the entry point (or the exit point when the
    /// origin is inside), None if the box is missed or behind the ray.
    pub fn ray_intersection(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = ray_dir.recip();

        let t1 = (self.min - ray_origin) * inv_dir;
        let t2 = (self.max - ray_origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        if tmax < 0.0 || tmin > tmax {
            return None;
        }

        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
