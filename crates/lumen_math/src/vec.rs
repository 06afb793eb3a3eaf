//! Extra vector operations the path tracer needs on top of `glam::Vec3`.

use glam::Vec3;
use thiserror::Error;

/// Errors raised by arithmetic that indicates a configuration mistake upstream.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("division of vector {0:?} by zero")]
    DivisionByZero(Vec3),
}

pub type MathResult<T> = Result<T, MathError>;

/// Components smaller than this are treated as zero by [`Vec3Ext::near_zero`].
const NEAR_ZERO: f32 = 1e-8;

/// Extension trait for `Vec3` with ray tracing helpers.
pub trait Vec3Ext: Sized {
    /// Normalize, falling back to the +X axis for the zero vector.
    fn unit_vector(self) -> Self;

    /// True if every component is close to zero.
    fn near_zero(self) -> bool;

    /// Divide by a scalar, rejecting a zero divisor instead of producing infinities.
    fn checked_div(self, s: f32) -> MathResult<Self>;

    /// Mirror this vector about the normal `n`.
    fn reflected(self, n: Self) -> Self;

    /// Bend this unit vector through a surface with normal `n` (Snell's law).
    ///
    /// `eta_ratio` is the incident over transmitted index of refraction.
    /// Callers must check for total internal reflection first.
    fn refracted(self, n: Self, eta_ratio: f32) -> Self;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn unit_vector(self) -> Vec3 {
        let len = self.length();
        if len == 0.0 {
            Vec3::X
        } else {
            self / len
        }
    }

    #[inline]
    fn near_zero(self) -> bool {
        self.x.abs() < NEAR_ZERO && self.y.abs() < NEAR_ZERO && self.z.abs() < NEAR_ZERO
    }

    fn checked_div(self, s: f32) -> MathResult<Vec3> {
        if s == 0.0 {
            return Err(MathError::DivisionByZero(self));
        }
        Ok(self * (1.0 / s))
    }

    #[inline]
    fn reflected(self, n: Vec3) -> Vec3 {
        self - 2.0 * self.dot(n) * n
    }

    #[inline]
    fn refracted(self, n: Vec3, eta_ratio: f32) -> Vec3 {
        let cos_theta = (-self).dot(n).min(1.0);
        let r_out_perp = eta_ratio * (self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}
