//! Ray picking against scene objects and intersection planes

use floorplan_core::IntersectionPlane;
use floorplan_renderer::{Camera, MeshStore, RenderObject, Scene};
use glam::{Vec2, Vec3};
use uuid::Uuid;

/// World-space ray with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Ray from the eye through a viewport pixel
    pub fn from_screen(camera: &Camera, pointer: Vec2, viewport: Vec2) -> Self {
        let (origin, direction) = camera.screen_to_ray(pointer.x, pointer.y, viewport.x, viewport.y);
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Pick the closest scene object accepted by `filter`.
/// Returns the object id and the hit distance, if any.
pub fn pick_object(
    ray: &Ray,
    scene: &Scene,
    meshes: &MeshStore,
    filter: impl Fn(&RenderObject) -> bool,
) -> Option<(Uuid, f32)> {
    let mut closest_hit: Option<(Uuid, f32)> = None;

    for object in scene.objects().filter(|o| o.visible && filter(o)) {
        let Some(mesh) = meshes.get(object.mesh) else {
            continue;
        };

        // AABB early rejection
        if object
            .world_bounds()
            .ray_intersection(ray.origin, ray.direction)
            .is_none()
        {
            continue;
        }

        for [a, b, c] in mesh.triangles() {
            let v0 = object.transform.transform_point3(a);
            let v1 = object.transform.transform_point3(b);
            let v2 = object.transform.transform_point3(c);

            if let Some(t) = ray_triangle_intersection(ray, v0, v1, v2) {
                match closest_hit {
                    Some((_, current_t)) if t >= current_t => {}
                    _ => closest_hit = Some((object.id, t)),
                }
            }
        }
    }

    closest_hit
}

/// Nearest intersection plane hit by the ray
pub fn intersect_planes<'a>(
    ray: &Ray,
    planes: &'a [IntersectionPlane],
) -> Option<(&'a IntersectionPlane, f32)> {
    let mut closest_hit: Option<(&IntersectionPlane, f32)> = None;

    for plane in planes {
        for [v0, v1, v2] in &plane.triangles {
            if let Some(t) = ray_triangle_intersection(ray, *v0, *v1, *v2) {
                match closest_hit {
                    Some((_, current_t)) if t >= current_t => {}
                    _ => closest_hit = Some((plane, t)),
                }
            }
        }
    }

    closest_hit
}

/// Where the ray crosses the horizontal plane `y = elevation`.
///
/// None when the ray is parallel to the plane or the plane is behind it.
pub fn intersect_horizontal_plane(ray: &Ray, elevation: f32) -> Option<Vec3> {
    if ray.direction.y.abs() < 1e-6 {
        return None;
    }
    let t = (elevation - ray.origin.y) / ray.direction.y;
    if t <= 0.0 {
        return None;
    }
    let mut point = ray.at(t);
    point.y = elevation;
    Some(point)
}

/// Ray-triangle intersection using Möller–Trumbore algorithm.
/// Both faces count as hits.
pub fn ray_triangle_intersection(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-6;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < EPSILON {
        return None; // Ray is parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t > EPSILON { Some(t) } else { None }
}
