//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared hittables: each range of primitives is sorted
//! by bounding-box centroid along the longest axis of the range's box and
//! split at the midpoint. The tree is immutable once built, so traversal is
//! safe from any number of threads.

use std::cmp::Ordering;
use std::sync::Arc;

use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};

/// BVH node - either a branch with two children or a leaf with one primitive.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node wrapping a single primitive.
    Leaf(Arc<dyn Hittable>),
    /// Empty tree (built from no objects). Never hit.
    Empty,
}

impl BvhNode {
    /// Build a BVH over a snapshot of the list's objects.
    pub fn new(list: &HittableList) -> Self {
        Self::from_objects(list.objects().to_vec())
    }

    /// Build a BVH from a list of shared hittable objects.
    pub fn from_objects(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let count = objects.len();
        let bvh = Self::build(objects);
        log::debug!(
            "Built BVH over {} primitives (depth {}, {} leaves)",
            count,
            bvh.depth(),
            bvh.leaf_count()
        );
        bvh
    }

    /// Recursive BVH construction.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.len() == 1 {
            if let Some(object) = objects.pop() {
                return BvhNode::Leaf(object);
            }
        }

        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, obj| Aabb::surrounding(&acc, &obj.bounding_box()));

        let axis = bbox.longest_axis();
        objects.sort_unstable_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

        // Split at midpoint
        let mid = objects.len() / 2;
        let right_objects = objects.split_off(mid);

        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Number of levels in the tree (a single leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf(_) => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of primitives referenced by the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf(_) => 1,
            BvhNode::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_val = a.bounding_box().centroid()[axis];
    let b_val = b.bounding_box().centroid()[axis];
    a_val.partial_cmp(&b_val).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf(object) => object.hit(ray, ray_t, rng),

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf(object) => object.bounding_box(),
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
