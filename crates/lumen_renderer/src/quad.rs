//! Planar parallelogram primitive and the box built from six of them.

use std::sync::Arc;

use lumen_math::{Aabb, Interval, Point3, Ray, Vec3, Vec3Ext};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Material;

/// Rays whose direction is this close to parallel with a plane are misses.
pub(crate) const PARALLEL_EPSILON: f32 = 1e-8;

const UNIT: Interval = Interval::new(0.0, 1.0);

/// A parallelogram spanned by corner `q` and edge vectors `u` and `v`.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)`, maps a planar offset to (alpha, beta)
    w: Vec3,
    normal: Vec3,
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
    degenerate: bool,
}

impl Quad {
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let nn = n.dot(n);
        let degenerate = nn == 0.0;
        let normal = n.unit_vector();
        let w = if degenerate { Vec3::ZERO } else { n / nn };

        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d: normal.dot(q),
            material,
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
            degenerate,
        }
    }

    /// Planar coordinates of a point already on the plane.
    fn planar_coords(&self, p: Point3) -> (f32, f32) {
        let planar = p - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));
        (alpha, beta)
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        if self.degenerate {
            return None;
        }

        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let (alpha, beta) = self.planar_coords(ray.at(t));
        if !UNIT.contains(alpha) || !UNIT.contains(beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            (alpha, beta),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Closed box with opposite corners `a` and `b`, as six outward-facing quads.
pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone()), // front
        Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone()), // right
        Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone()), // back
        Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone()), // left
        Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone()), // top
        Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material), // bottom
    ];

    faces.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use lumen_math::Color;
    use rand::rngs::mock::StepRng;

    fn unit_quad() -> Quad {
        Quad::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )
    }

    fn probe(quad: &Quad, x: f32, y: f32) -> Option<(f32, f32, f32)> {
        let ray = Ray::new(Vec3::new(x, y, 1.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut StepRng::new(0, 1))
            .map(|rec| (rec.t, rec.u, rec.v))
    }

    #[test]
    fn test_quad_interior_hit() {
        let (t, u, v) = probe(&unit_quad(), 0.5, 0.5).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_quad_exterior_miss() {
        assert!(probe(&unit_quad(), 1.5, 0.5).is_none());
        assert!(probe(&unit_quad(), 0.5, -0.25).is_none());
    }

    #[test]
    fn test_quad_parallel_ray_misses() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.5, 0.5, 1.0), Vec3::new(1.0, 0.0, 0.0), 0.0);
        assert!(quad
            .hit(&ray, Interval::UNIVERSE, &mut StepRng::new(0, 1))
            .is_none());
    }

    #[test]
    fn test_degenerate_quad_never_hits() {
        let quad = Quad::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Arc::new(Lambertian::new(Color::ONE)),
        );
        assert!(probe(&quad, 0.5, 0.0).is_none());
    }

    #[test]
    fn test_quad_bbox_is_padded() {
        let bbox = unit_quad().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!((bbox.x.max - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_box_normals_face_outward() {
        let cube = make_box(
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
            Arc::new(Lambertian::new(Color::ONE)),
        );
        assert_eq!(cube.len(), 6);

        let mut rng = StepRng::new(0, 1);
        let dirs = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
        for dir in dirs {
            let ray = Ray::new(dir * 5.0, -dir, 0.0);
            let rec = cube
                .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                .unwrap();
            assert!((rec.t - 4.0).abs() < 1e-4);
            assert!(rec.front_face, "face along {:?} points inward", dir);
            assert!((rec.normal - dir).length() < 1e-4);
        }
    }
}
