//! Lumen Renderer - CPU path tracing core.
//!
//! A Monte Carlo path tracer built from:
//! - **Hittables**: spheres (static and moving), quads, triangles, constant
//!   density media, and translate / rotate-Y instancing wrappers
//! - **BVH**: a binary bounding volume hierarchy over shared hittables
//! - **Materials and textures**: diffuse, metal, glass, emitters, isotropic
//!   media; solid, checker, image and Perlin noise textures
//! - **Camera**: ray generation with depth of field and motion blur, and the
//!   radiance estimator
//! - **Renderer**: serial, per-scanline and per-tile parallel scheduling
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lumen_renderer::*;
//!
//! let mut world = HittableList::new();
//! world.add(Arc::new(Sphere::new(
//!     Vec3::new(0.0, 0.0, -1.0),
//!     0.5,
//!     Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
//! )));
//!
//! let camera = Camera::new().with_image(400, 16.0 / 9.0).with_quality(100, 50);
//! Renderer::new(RenderConfig::default()).render_to_file(&camera, &BvhNode::new(&world))?;
//! ```

pub mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod material;
mod medium;
pub mod mesh;
mod perlin;
mod quad;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bucket::{Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use mesh::{load_triangles, transform_triangles};
pub use perlin::Perlin;
pub use quad::{make_box, Quad};
pub use renderer::{render_serial_with_rng, Framebuffer, RenderConfig, RenderMode, Renderer};
pub use sampling::WorkerRng;
pub use sphere::{sphere_uv, Sphere};
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::{RotateY, Translate};
pub use triangle::{make_pyramid, Triangle};

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
