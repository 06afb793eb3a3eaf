//! Gradient (Perlin) noise and turbulence.

use lumen_math::{Point3, Vec3};
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::sampling::random_unit_vector;

const POINT_COUNT: usize = 256;

/// Lattice gradient noise over 256 random unit vectors.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smooth noise in roughly `[-1, 1]`, zero at every lattice point.
    pub fn noise(&self, p: Point3) -> f32 {
        let floor = p.floor();
        let (u, v, w) = (p.x - floor.x, p.y - floor.y, p.z - floor.z);
        let (i, j, k) = (floor.x as i32, floor.y as i32, floor.z as i32);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *cell = self.gradients[index];
                }
            }
        }

        interpolate(&c, u, v, w)
    }

    /// Sum of `depth` octaves of noise, each at double frequency and half weight.
    pub fn turbulence(&self, p: Point3, depth: usize) -> f32 {
        let mut accum = 0.0;
        let mut weight = 1.0;
        let mut temp_p = p;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

/// Trilinear blend of the corner gradients with Hermite smoothing.
fn interpolate(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        let fi = i as f32;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f32;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f32;
                let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight_v);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_noise_vanishes_on_lattice() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(1));
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-100.0, 5.0, 0.0)] {
            assert!(perlin.noise(p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_noise_is_bounded_and_varies() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(2));
        let mut rng = StdRng::seed_from_u64(3);
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for _ in 0..2000 {
            let p = Vec3::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            let n = perlin.noise(p);
            assert!(n.abs() <= 1.5);
            min = min.min(n);
            max = max.max(n);
        }

        assert!(max - min > 0.2);
    }

    #[test]
    fn test_same_seed_same_noise() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(4));
        let b = Perlin::new(&mut StdRng::seed_from_u64(4));
        let p = Vec3::new(1.3, -0.7, 2.2);
        assert_eq!(a.noise(p), b.noise(p));
        assert_eq!(a.turbulence(p, 7), b.turbulence(p, 7));
    }

    #[test]
    fn test_turbulence_non_negative() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(5));
        for i in 0..100 {
            let p = Vec3::splat(i as f32 * 0.173);
            assert!(perlin.turbulence(p, 7) >= 0.0);
        }
        assert_eq!(perlin.turbulence(Vec3::new(0.4, 0.2, 0.9), 0), 0.0);
    }
}
