//! Random sampling helpers and the per-worker random source.
//!
//! Every sampler takes `&mut dyn RngCore` so the integrator can be driven by a
//! worker's own generator or by a fixed sequence in tests. The samplers are
//! closed-form (no rejection loops), so any input stream terminates.

use std::f32::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};

use lumen_math::{Color, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in `[min, max)`.
#[inline]
pub fn gen_range_f32(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let z = 1.0 - 2.0 * gen_f32(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniformly distributed point inside the unit disk in the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    let r = gen_f32(rng).sqrt();
    let theta = 2.0 * PI * gen_f32(rng);
    Vec3::new(r * theta.cos(), r * theta.sin(), 0.0)
}

/// Color with each channel uniform in `[min, max)`.
pub fn random_color(rng: &mut dyn RngCore, min: f32, max: f32) -> Color {
    Color::new(
        gen_range_f32(rng, min, max),
        gen_range_f32(rng, min, max),
        gen_range_f32(rng, min, max),
    )
}

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random source owned by one render worker.
///
/// Unseeded workers mix their worker index with the clock, so streams are
/// independent but runs are not reproducible. A fixed seed is mixed with the
/// work-item index instead, which gives the same image for any scheduling.
pub struct WorkerRng {
    rng: SmallRng,
}

impl WorkerRng {
    /// Fresh stream for a worker thread, seeded from its index and the clock.
    pub fn for_worker(worker: usize) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(nanos, worker as u64)
    }

    /// Fresh stream for the current rayon worker.
    pub fn for_current_thread() -> Self {
        Self::for_worker(rayon::current_thread_index().unwrap_or(0))
    }

    /// Stream derived from a fixed seed and a work-item index.
    pub fn seeded(seed: u64, item: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed ^ item.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)),
        }
    }

    /// Restart the stream for a new work item when rendering with a fixed seed.
    pub fn reseed(&mut self, seed: u64, item: u64) {
        *self = Self::seeded(seed, item);
    }
}

impl RngCore for WorkerRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
