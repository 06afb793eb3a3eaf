//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use lumen_math::{Aabb, Interval, Point3, Ray, Vec3, Vec3Ext};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::quad::{Quad, PARALLEL_EPSILON};
use crate::Material;

/// A triangle primitive.
#[derive(Clone)]
pub struct Triangle {
    /// Vertices
    v0: Point3,
    v1: Point3,
    v2: Point3,
    /// Face normal (unit length)
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Point3, v1: Point3, v2: Point3, material: Arc<dyn Material>) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).unit_vector();
        let bbox = Aabb::surrounding(&Aabb::from_points(v0, v1), &Aabb::from_points(v1, v2));

        Self {
            v0,
            v1,
            v2,
            normal,
            material,
            bbox,
        }
    }

    /// The three corners.
    pub fn vertices(&self) -> [Point3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Copy of this triangle with each vertex scaled per axis, then translated.
    pub fn transformed(&self, scale: Vec3, translate: Vec3) -> Self {
        Self::new(
            self.v0 * scale + translate,
            self.v1 * scale + translate,
            self.v2 * scale + translate,
            Arc::clone(&self.material),
        )
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // `a` is d . n scaled by twice the area; compare as the quad test does
        // against a unit normal. Zero-area triangles fail here too.
        if a.abs() <= PARALLEL_EPSILON * edge1.cross(edge2).length() {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
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
        if !ray_t.contains(t) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            (u, v),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Pyramid over the axis-aligned base rectangle at `base_min.y`.
///
/// The base is one quad, the sides are four triangles meeting at `apex`.
pub fn make_pyramid(
    base_min: Point3,
    base_max: Point3,
    apex: Point3,
    material: Arc<dyn Material>,
) -> HittableList {
    let a = Vec3::new(base_min.x, base_min.y, base_min.z);
    let b = Vec3::new(base_max.x, base_min.y, base_min.z);
    let c = Vec3::new(base_max.x, base_min.y, base_max.z);
    let d = Vec3::new(base_min.x, base_min.y, base_max.z);

    let mut sides = HittableList::new();
    sides.add(Arc::new(Quad::new(a, b - a, d - a, material.clone())));
    sides.add(Arc::new(Triangle::new(a, b, apex, material.clone())));
    sides.add(Arc::new(Triangle::new(b, c, apex, material.clone())));
    sides.add(Arc::new(Triangle::new(c, d, apex, material.clone())));
    sides.add(Arc::new(Triangle::new(d, a, apex, material)));
    sides
}
