//! Render scheduling: turns a camera and a scene into a framebuffer.
//!
//! Three strategies share the same per-pixel estimator:
//! - `Serial`: one worker, scanline by scanline
//! - `Rows`: rayon parallel-for over scanlines
//! - `Tiles`: rayon parallel-for over square buckets, copied back afterwards
//!
//! Workers write disjoint pixels, and the scene is only read, so the only
//! shared mutable state is the progress counter.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::error::{RenderError, RenderResult};
use crate::sampling::WorkerRng;
use crate::{Camera, Color, Hittable};

/// How the image is split across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    Serial,
    Rows,
    #[default]
    Tiles,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Serial => "serial",
            RenderMode::Rows => "rows",
            RenderMode::Tiles => "tiles",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serial" => Ok(RenderMode::Serial),
            "rows" => Ok(RenderMode::Rows),
            "tiles" => Ok(RenderMode::Tiles),
            other => Err(RenderError::InvalidConfig(format!(
                "unknown render mode {:?} (expected serial, rows or tiles)",
                other
            ))),
        }
    }
}

/// Render scheduling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Bucket edge in pixels for `RenderMode::Tiles`
    pub tile_size: u32,
    /// Fixed seed for reproducible renders; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Tiles,
            tile_size: DEFAULT_BUCKET_SIZE,
            seed: None,
        }
    }
}

/// Linear RGB image, row-major with the top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Mutable view of scanline `y`.
    pub fn row_mut(&mut self, y: u32) -> &mut [Color] {
        let start = self.index(0, y);
        let end = start + self.width as usize;
        &mut self.pixels[start..end]
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        let width = bucket.width as usize;

        for (local_y, src) in result.pixels.chunks_exact(width).enumerate() {
            let start = self.index(bucket.x, bucket.y + local_y as u32);
            self.pixels[start..start + width].copy_from_slice(src);
        }
    }

    /// Mean color over all pixels.
    pub fn mean(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().copied().sum::<Color>() / self.pixels.len() as f32
    }
}

/// Logs completion every 10 % of work items.
struct Progress {
    done: AtomicUsize,
    total: usize,
    unit: &'static str,
}

impl Progress {
    fn new(total: usize, unit: &'static str) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            unit,
        }
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let percent = done * 100 / self.total.max(1);
        let previous = (done - 1) * 100 / self.total.max(1);
        if percent / 10 != previous / 10 {
            log::info!("{}% ({}/{} {})", percent, done, self.total, self.unit);
        }
    }
}

/// Drives a full render of a scene.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `world` through `camera` using the configured strategy.
    ///
    /// The camera is validated and initialized on a private copy.
    pub fn render(&self, camera: &Camera, world: &dyn Hittable) -> RenderResult<Framebuffer> {
        let camera = prepare(camera)?;
        if self.config.mode == RenderMode::Tiles && self.config.tile_size == 0 {
            return Err(RenderError::InvalidConfig("tile size is zero".into()));
        }

        log::info!(
            "Rendering {}x{} at {} spp, max depth {}, mode {} on {} threads",
            camera.image_width,
            camera.image_height(),
            camera.samples_per_pixel,
            camera.max_depth,
            self.config.mode,
            rayon::current_num_threads()
        );
        let start = Instant::now();

        let framebuffer = match self.config.mode {
            RenderMode::Serial => self.render_serial(&camera, world),
            RenderMode::Rows => self.render_rows(&camera, world),
            RenderMode::Tiles => self.render_tiles(&camera, world),
        };

        log::info!("Render finished in {:.2?}", start.elapsed());
        log::debug!("Mean radiance {:?}", framebuffer.mean());
        Ok(framebuffer)
    }

    /// Render, then write the image to `camera.output_filename`.
    pub fn render_to_file(
        &self,
        camera: &Camera,
        world: &dyn Hittable,
    ) -> RenderResult<Framebuffer> {
        let framebuffer = self.render(camera, world)?;
        lumen_core::write_image(
            &camera.output_filename,
            framebuffer.width,
            framebuffer.height,
            &framebuffer.pixels,
        )?;
        Ok(framebuffer)
    }

    fn render_serial(&self, camera: &Camera, world: &dyn Hittable) -> Framebuffer {
        let mut framebuffer = Framebuffer::new(camera.image_width, camera.image_height());
        let progress = Progress::new(framebuffer.height as usize, "rows");
        let mut rng = WorkerRng::for_worker(0);

        for j in 0..framebuffer.height {
            if let Some(seed) = self.config.seed {
                rng.reseed(seed, j as u64);
            }
            render_row(camera, world, j, framebuffer.row_mut(j), &mut rng);
            progress.tick();
        }

        framebuffer
    }

    fn render_rows(&self, camera: &Camera, world: &dyn Hittable) -> Framebuffer {
        let mut framebuffer = Framebuffer::new(camera.image_width, camera.image_height());
        let progress = Progress::new(framebuffer.height as usize, "rows");
        let seed = self.config.seed;

        framebuffer
            .pixels
            .par_chunks_mut(camera.image_width as usize)
            .enumerate()
            .for_each_init(WorkerRng::for_current_thread, |rng, (j, row)| {
                if let Some(seed) = seed {
                    rng.reseed(seed, j as u64);
                }
                render_row(camera, world, j as u32, row, rng);
                progress.tick();
            });

        framebuffer
    }

    fn render_tiles(&self, camera: &Camera, world: &dyn Hittable) -> Framebuffer {
        let mut framebuffer = Framebuffer::new(camera.image_width, camera.image_height());
        let buckets = generate_buckets(framebuffer.width, framebuffer.height, self.config.tile_size);
        let progress = Progress::new(buckets.len(), "tiles");
        let seed = self.config.seed;

        let results: Vec<BucketResult> = buckets
            .par_iter()
            .map_init(WorkerRng::for_current_thread, |rng, bucket| {
                if let Some(seed) = seed {
                    rng.reseed(seed, bucket.index as u64);
                }
                let result = render_bucket(bucket, camera, world, rng);
                progress.tick();
                result
            })
            .collect();

        for result in &results {
            framebuffer.write_bucket(result);
        }

        framebuffer
    }
}

/// Render a whole image on the calling thread from a single random stream.
///
/// Useful for driving the integrator with a fixed sequence.
pub fn render_serial_with_rng(
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
) -> RenderResult<Framebuffer> {
    let camera = prepare(camera)?;
    let mut framebuffer = Framebuffer::new(camera.image_width, camera.image_height());

    for j in 0..framebuffer.height {
        render_row(&camera, world, j, framebuffer.row_mut(j), rng);
    }

    Ok(framebuffer)
}

fn prepare(camera: &Camera) -> RenderResult<Camera> {
    let mut camera = camera.clone();
    camera.initialize()?;
    Ok(camera)
}

fn render_row(
    camera: &Camera,
    world: &dyn Hittable,
    j: u32,
    row: &mut [Color],
    rng: &mut dyn RngCore,
) {
    for (i, pixel) in row.iter_mut().enumerate() {
        *pixel = camera.render_pixel(i as u32, j, world, rng);
    }
}
