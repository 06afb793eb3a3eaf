//! Instancing wrappers that place a child hittable under a rigid transform.

use std::sync::Arc;

use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};

/// A child object moved by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        // Move the ray into object space
        let offset_ray = Ray::new(ray.origin - self.offset, ray.direction, ray.time);

        let mut rec = self.object.hit(&offset_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A child object rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate `object` by `degrees`, counter-clockwise looking down -Y.
    pub fn new(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // Hull of the rotated corners. Looser than the rotated shape, never clipping.
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in object.bounding_box().corners() {
            let rotated = Vec3::new(
                cos_theta * corner.x + sin_theta * corner.z,
                corner.y,
                -sin_theta * corner.x + cos_theta * corner.z,
            );
            min = min.min(rotated);
            max = max.max(rotated);
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }

    #[inline]
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let rotated = Ray::new(
            self.to_object(ray.origin),
            self.to_object(ray.direction),
            ray.time,
        );

        let mut rec = self.object.hit(&rotated, ray_t, rng)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::quad::{make_box, Quad};
    use crate::{Material, Sphere, Triangle};
    use lumen_math::Color;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cube() -> Arc<dyn Hittable> {
        Arc::new(make_box(
            Vec3::ZERO,
            Vec3::splat(1.0),
            Arc::new(Lambertian::new(Color::ONE)),
        ))
    }

    #[test]
    fn test_translate_moves_hit_point() {
        let sphere = Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::new(Color::ONE)),
        ));
        let moved = Translate::new(sphere, Vec3::new(10.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let rec = moved
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut StepRng::new(0, 1))
            .unwrap();
        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!((rec.p - Vec3::new(10.0, 0.0, 1.0)).length() < 1e-5);
        assert!((moved.bounding_box().x.min - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // A unit cube turned 90 degrees occupies x in [0, 1], z in [-1, 0]
        let rotated = RotateY::new(cube(), 90.0);
        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let rec = rotated
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut StepRng::new(0, 1))
            .unwrap();
        assert!((rec.t - 5.0).abs() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
        assert!((rec.p - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-4);
    }

    /// Fire random rays at `object` and check every hit lies inside its box.
    fn assert_hits_inside_bbox(object: &dyn Hittable, seed: u64) {
        let bbox = object.bounding_box();
        let slack = Aabb::new(bbox.x.expand(1e-3), bbox.y.expand(1e-3), bbox.z.expand(1e-3));
        let mut rng = StdRng::seed_from_u64(seed);
        let mut hits = 0;

        for _ in 0..2000 {
            let origin = bbox.centroid()
                + Vec3::new(
                    rng.gen_range(-8.0..8.0),
                    rng.gen_range(-8.0..8.0),
                    rng.gen_range(-8.0..8.0),
                );
            let target = bbox.centroid()
                + Vec3::new(
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                );
            let ray = Ray::new(origin, target - origin, 0.0);

            if let Some(rec) = object.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng) {
                hits += 1;
                assert!(slack.contains(rec.p), "hit {:?} outside {:?}", rec.p, bbox);
            }
        }

        assert!(hits > 0);
    }

    #[test]
    fn test_primitive_hits_stay_in_bbox() {
        let mat: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        let quad = Quad::new(
            Vec3::new(-1.0, -0.5, 0.2),
            Vec3::new(2.0, 0.0, 0.5),
            Vec3::new(0.0, 1.0, 0.3),
            Arc::clone(&mat),
        );
        let triangle = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -0.5, 0.4),
            Vec3::new(0.0, 1.0, -0.3),
            Arc::clone(&mat),
        );
        let shifted = Translate::new(Arc::new(triangle.clone()), Vec3::new(3.0, -2.0, 1.0));

        assert_hits_inside_bbox(&quad, 11);
        assert_hits_inside_bbox(&triangle, 12);
        assert_hits_inside_bbox(&shifted, 13);
        assert_hits_inside_bbox(&Translate::new(cube(), Vec3::new(-4.0, 1.0, 2.0)), 14);
    }

    #[test]
    fn test_rotated_hits_stay_in_bbox() {
        let rotated = RotateY::new(Arc::new(Translate::new(cube(), Vec3::new(2.0, 0.0, 1.0))), 33.0);
        let bbox = rotated.bounding_box();
        let slack = Aabb::new(bbox.x.expand(1e-4), bbox.y.expand(1e-4), bbox.z.expand(1e-4));
        let mut rng = StdRng::seed_from_u64(99);
        let mut hits = 0;

        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-6.0..6.0),
            );
            let target = bbox.centroid() + Vec3::splat(rng.gen_range(-0.5..0.5));
            let ray = Ray::new(origin, target - origin, 0.0);

            if let Some(rec) = rotated.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng) {
                hits += 1;
                assert!(slack.contains(rec.p), "hit {:?} outside {:?}", rec.p, bbox);
            }
        }

        assert!(hits > 0);
    }
}
