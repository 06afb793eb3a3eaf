//! Textures: map surface coordinates and a world point to a color.

use std::path::Path;
use std::sync::Arc;

use lumen_core::ImageData;
use lumen_math::{Color, Interval, Point3};
use rand::RngCore;

use crate::error::RenderResult;
use crate::perlin::Perlin;

/// Returned by an image texture with no pixels.
const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

const UNIT: Interval = Interval::new(0.0, 1.0);

/// Trait for textures sampled by materials.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color;
}

/// A single constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Point3) -> Color {
        self.albedo
    }
}

/// Solid 3D checkerboard alternating between two textures.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    /// `scale` is the edge length of one cell in world units.
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color {
        // Parity per axis in float space; huge or non-finite cells never overflow
        let cell = (self.inv_scale * p).floor();
        let parity: f32 = cell.to_array().iter().map(|c| c.rem_euclid(2.0)).sum();

        if parity.rem_euclid(2.0) < 0.5 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Nearest-pixel lookup into a decoded image.
pub struct ImageTexture {
    image: ImageData,
}

impl ImageTexture {
    pub fn new(image: ImageData) -> Self {
        Self { image }
    }

    /// Decode the image at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        Ok(Self::new(ImageData::open(path)?))
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Point3) -> Color {
        if self.image.is_empty() {
            return MISSING_IMAGE_COLOR;
        }

        // Image rows run top to bottom, v runs bottom to top
        let u = UNIT.clamp(u);
        let v = 1.0 - UNIT.clamp(v);

        let i = (u * self.image.width as f32) as i64;
        let j = (v * self.image.height as f32) as i64;
        Color::from_array(self.image.pixel(i, j))
    }
}

/// Marble-like pattern from Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Point3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turbulence(p, 7);
        Color::splat(0.5) * (1.0 + phase.sin())
    }
}
