#![warn(missing_docs)]

//! Math types for the quadric surface kernel.
//!
//! Provides [`V3D`], the point/vector value type used throughout the
//! kernel, thin aliases over nalgebra for the 3x3 matrix collaborator,
//! and the tolerance constants shared by the surface and track crates.

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

mod v3d;

pub use v3d::V3D;

/// A 3x3 matrix, used for rotations and basis changes.
pub type Mat3 = Matrix3<f64>;

/// A column vector in 3D space (nalgebra form of [`V3D`]).
pub type Vec3 = Vector3<f64>;

/// A point in 3D space (nalgebra form of [`V3D`]).
pub type Point3 = nalgebra::Point3<f64>;

/// Errors raised by vector operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Component index outside `0..3`.
    #[error("component index {0} out of range (expected 0..3)")]
    IndexOutOfRange(usize),

    /// Basis matrix could not be inverted.
    #[error("singular basis (determinant {0:e})")]
    SingularBasis(f64),
}

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Point coincidence tolerance.
    pub linear: f64,
    /// Absolute tolerance on a quadric equation value for "on surface".
    pub surface: f64,
    /// Distance tolerance used to order coincident track crossings.
    pub crossing: f64,
    /// Largest gap allowed between consecutive track segments.
    pub track_gap: f64,
    /// Smallest determinant accepted when inverting a basis.
    pub determinant: f64,
}

impl Tolerance {
    /// Default kernel tolerances.
    pub const DEFAULT: Self = Self {
        linear: 1e-8,
        surface: 1e-6,
        crossing: 1e-5,
        track_gap: 1e-6,
        determinant: 1e-13,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &V3D, b: &V3D) -> bool {
        a.distance(b) <= self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() <= self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rotation matrix about an arbitrary axis through the origin by `angle` radians.
///
/// Uses Rodrigues' rotation formula. The axis does not need to be normalized;
/// a zero axis yields the identity.
pub fn rotation_about_axis(axis: &V3D, angle: f64) -> Mat3 {
    let k = axis.unit();
    if k.null_vector(Tolerance::DEFAULT.linear) {
        return Mat3::identity();
    }
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (k.x, k.y, k.z);
    Mat3::new(
        t * x * x + c,
        t * x * y - s * z,
        t * x * z + s * y,
        t * x * y + s * z,
        t * y * y + c,
        t * y * z - s * x,
        t * x * z - s * y,
        t * y * z + s * x,
        t * z * z + c,
    )
}

/// Rotation about the X axis by `angle` radians.
pub fn rotation_x(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Rotation about the Y axis by `angle` radians.
pub fn rotation_y(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Rotation about the Z axis by `angle` radians.
pub fn rotation_z(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}
