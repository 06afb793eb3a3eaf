//! Camera: ray generation and the path-tracing integrator.

use lumen_math::{Color, Interval, Point3, Ray, Vec3, Vec3Ext};
use rand::RngCore;

use crate::error::{RenderError, RenderResult};
use crate::hittable::Hittable;
use crate::sampling::{gen_f32, random_in_unit_disk};

/// Nearest hit distance the integrator accepts, so bounces do not re-hit their origin.
const MIN_HIT_DISTANCE: f32 = 0.001;

/// Camera for generating rays into the scene.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub aspect_ratio: f32,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    /// Radiance returned by rays that escape the scene
    pub background: Color,

    // Camera positioning
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,

    // Lens settings
    pub vfov: f32,          // Vertical field of view in degrees
    pub defocus_angle: f32, // Variation angle of rays through each pixel
    pub focus_dist: f32,    // Distance from camera to plane of perfect focus

    pub output_filename: String,

    // Cached computed values (set by initialize())
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::ZERO,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            output_filename: "output.png".to_string(),
            image_height: 100,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 0.1,
        }
    }

    /// Set image width and aspect ratio; the height is derived.
    pub fn with_image(mut self, width: u32, aspect_ratio: f32) -> Self {
        self.image_width = width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the file the finished image is written to.
    pub fn with_output(mut self, filename: impl Into<String>) -> Self {
        self.output_filename = filename.into();
        self
    }

    /// Derived image height (at least 1). Valid after `initialize()`.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Validate the settings and compute the viewport and lens geometry.
    ///
    /// Must be called before generating rays; calling it again after changing
    /// settings recomputes everything.
    pub fn initialize(&mut self) -> RenderResult<()> {
        if self.image_width == 0 {
            return Err(RenderError::InvalidCamera("image width is zero".into()));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(RenderError::InvalidCamera(format!(
                "aspect ratio {} is not positive",
                self.aspect_ratio
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidCamera("samples per pixel is zero".into()));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::InvalidCamera(format!(
                "vertical field of view {} is outside (0, 180)",
                self.vfov
            )));
        }
        if self.focus_dist <= 0.0 {
            return Err(RenderError::InvalidCamera(format!(
                "focus distance {} is not positive",
                self.focus_dist
            )));
        }

        self.image_height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);
        self.samples_scale = 1.0 / self.samples_per_pixel as f32;
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Camera basis; coincident look_from/look_at or vup parallel to the view fail here
        let view = self.look_from - self.look_at;
        self.w = view.checked_div(view.length())?;
        let side = self.vup.cross(self.w);
        self.u = side.checked_div(side.length())?;
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        Ok(())
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray passes through a jittered point inside the pixel, starts on
    /// the defocus disk when depth of field is enabled, and carries a random
    /// shutter time for motion blur.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Radiance arriving along `ray`, following at most `depth` bounces.
    ///
    /// Each hit adds the surface's emission weighted by the attenuation
    /// gathered so far; the path ends when a ray escapes (background), is
    /// absorbed, or runs out of depth (black). This is the iterative form
    /// of `emitted + attenuation * ray_color(scattered, depth - 1)`.
    pub fn ray_color(
        &self,
        ray: &Ray,
        depth: u32,
        world: &dyn Hittable,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut radiance = Color::ZERO;
        let mut throughput = Color::ONE;
        let mut ray = *ray;

        for _ in 0..depth {
            let Some(rec) = world.hit(&ray, Interval::new(MIN_HIT_DISTANCE, f32::INFINITY), rng)
            else {
                return radiance + throughput * self.background;
            };

            radiance += throughput * rec.material.emitted(rec.u, rec.v, rec.p);

            match rec.material.scatter(&ray, &rec, rng) {
                Some(result) => {
                    throughput *= result.attenuation;
                    ray = result.scattered;
                }
                None => return radiance,
            }
        }

        radiance
    }

    /// Mean of `samples_per_pixel` radiance estimates for pixel (i, j).
    pub fn render_pixel(
        &self,
        i: u32,
        j: u32,
        world: &dyn Hittable,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut pixel_color = Color::ZERO;
        for _ in 0..self.samples_per_pixel {
            let ray = self.get_ray(i, j, rng);
            pixel_color += self.ray_color(&ray, self.max_depth, world, rng);
        }
        pixel_color * self.samples_scale
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}
