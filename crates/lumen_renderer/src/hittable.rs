//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::Material;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
///
/// `rng` is the calling worker's random source. Only participating media
/// draw from it; surfaces ignore it.
pub trait Hittable: Send + Sync {
    /// Closest hit with `t` inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// A list of hittable objects.
///
/// Objects are shared, so the same primitive can sit in a list and in a BVH
/// built over it.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Add every object of another list.
    pub fn extend(&mut self, other: &HittableList) {
        for object in &other.objects {
            self.add(Arc::clone(object));
        }
    }

    /// Shared handles to the contained objects.
    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<H: Hittable + 'static> FromIterator<H> for HittableList {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        let mut list = HittableList::new();
        for object in iter {
            list.add(Arc::new(object));
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let max = closest.map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max), rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use lumen_math::Color;
    use rand::rngs::mock::StepRng;

    fn sphere_at(z: f32) -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, z),
            0.5,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )
    }

    #[test]
    fn test_list_returns_closest_hit() {
        let mut list = HittableList::new();
        list.add(Arc::new(sphere_at(-5.0)));
        list.add(Arc::new(sphere_at(-2.0)));
        list.add(Arc::new(sphere_at(-8.0)));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = list
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut StepRng::new(0, 1))
            .unwrap();
        assert!((rec.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_list_bbox_grows_on_insert() {
        let mut list = HittableList::new();
        assert!(list.is_empty());

        list.add(Arc::new(sphere_at(-2.0)));
        list.add(Arc::new(sphere_at(-8.0)));
        let bbox = list.bounding_box();

        assert_eq!(list.len(), 2);
        assert!((bbox.z.min - (-8.5)).abs() < 1e-4);
        assert!((bbox.z.max - (-1.5)).abs() < 1e-4);

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_set_face_normal_flips_for_back_face() {
        let mat = Lambertian::new(Color::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 0.0);
        let rec = HitRecord::new(&ray, 1.0, Vec3::new(0.0, 0.0, 1.0), (0.0, 0.0), &mat);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_from_iterator() {
        let list: HittableList = [-2.0, -4.0, -6.0].into_iter().map(sphere_at).collect();
        assert_eq!(list.len(), 3);
        assert_eq!(list.objects().len(), 3);
    }
}
