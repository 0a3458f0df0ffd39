//! The [`V3D`] point/vector value type.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::{Mat3, MathError, Point3, Result, Tolerance, Vec3};

/// A point or vector in 3D space.
///
/// Equality is tolerance based: two values compare equal when their
/// Euclidean distance is at most [`Tolerance::DEFAULT`]`.linear` (1e-8).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct V3D {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl V3D {
    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Unit vector along X.
    pub const fn x_axis() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Unit vector along Y.
    pub const fn y_axis() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// Unit vector along Z.
    pub const fn z_axis() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Unit vector along cardinal axis `index` (0, 1 or 2).
    pub fn axis(index: usize) -> Result<Self> {
        let mut v = Self::zero();
        v.set_component(index, 1.0)?;
        Ok(v)
    }

    /// Component `index` (0 = x, 1 = y, 2 = z).
    pub fn component(&self, index: usize) -> Result<f64> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(MathError::IndexOutOfRange(index)),
        }
    }

    /// Set component `index` (0 = x, 1 = y, 2 = z).
    pub fn set_component(&mut self, index: usize, value: f64) -> Result<()> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => return Err(MathError::IndexOutOfRange(index)),
        }
        Ok(())
    }

    /// Components as an array.
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product.
    pub fn dot(&self, other: &V3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &V3D) -> V3D {
        V3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Scalar triple product `self · (b × c)`.
    pub fn triple_product(&self, b: &V3D, c: &V3D) -> f64 {
        self.dot(&b.cross(c))
    }

    /// Magnitude.
    pub fn norm(&self) -> f64 {
        self.norm2().sqrt()
    }

    /// Squared magnitude.
    pub fn norm2(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &V3D) -> f64 {
        (*self - *other).norm()
    }

    /// Normalize in place and return the magnitude before normalization.
    ///
    /// A vector with magnitude at or below the linear tolerance is left
    /// unchanged.
    pub fn make_unit(&mut self) -> f64 {
        let size = self.norm();
        if size > Tolerance::DEFAULT.linear {
            self.x /= size;
            self.y /= size;
            self.z /= size;
        }
        size
    }

    /// Normalized copy (unchanged copy for a near-zero vector).
    pub fn unit(&self) -> V3D {
        let mut out = *self;
        out.make_unit();
        out
    }

    /// True if every component is within `tol` of zero.
    pub fn null_vector(&self, tol: f64) -> bool {
        self.x.abs() <= tol && self.y.abs() <= tol && self.z.abs() <= tol
    }

    /// Angle to another vector in radians (0 if either is zero).
    pub fn angle(&self, other: &V3D) -> f64 {
        let denom = self.norm() * other.norm();
        if denom <= 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }

    /// Rotate about an axis through `origin` by `angle` radians (Rodrigues).
    pub fn rotate_about(&mut self, origin: &V3D, axis: &V3D, angle: f64) {
        let k = axis.unit();
        let v = *self - *origin;
        let (s, c) = angle.sin_cos();
        let rotated = v * c + k.cross(&v) * s + k * (k.dot(&v) * (1.0 - c));
        *self = *origin + rotated;
    }

    /// Rotate by a matrix, treating the point as a column vector (`m * p`).
    pub fn rotate(&mut self, m: &Mat3) {
        *self = V3D::from(m * Vec3::from(*self));
    }

    /// Signed index (±1..±3) of the cardinal axis this vector lies along.
    ///
    /// Returns 0 when the squared off-axis components exceed `tol` times the
    /// squared dominant component, or for the zero vector.
    pub fn master_dir(&self, tol: f64) -> i32 {
        let comps = self.to_array();
        let mut max = comps[0] * comps[0];
        let mut idx = if comps[0] > 0.0 { 1 } else { -1 };
        for (i, c) in comps.iter().enumerate().skip(1) {
            let sq = c * c;
            if sq > max {
                max = sq;
                let axis = i as i32 + 1;
                idx = if *c > 0.0 { axis } else { -axis };
            }
        }
        if max <= 0.0 {
            return 0;
        }
        let other = self.norm2() - max;
        if other / max > tol {
            return 0;
        }
        idx
    }

    /// Re-express this point in the basis `(a, b, c)`.
    ///
    /// On a singular basis the point is left unchanged.
    pub fn re_base(&mut self, a: &V3D, b: &V3D, c: &V3D) -> Result<()> {
        let basis = Mat3::from_columns(&[Vec3::from(*a), Vec3::from(*b), Vec3::from(*c)]);
        let det = basis.determinant();
        if det.abs() < Tolerance::DEFAULT.determinant {
            return Err(MathError::SingularBasis(det));
        }
        let inverse = basis
            .try_inverse()
            .ok_or(MathError::SingularBasis(det))?;
        self.rotate(&inverse);
        Ok(())
    }

    /// True if `self`, `b` and `c` lie on one line.
    pub fn co_linear(&self, b: &V3D, c: &V3D) -> bool {
        let edge = (*b - *self).cross(&(*c - *self));
        edge.norm() <= Tolerance::DEFAULT.linear
    }
}

impl PartialEq for V3D {
    fn eq(&self, other: &Self) -> bool {
        self.distance(other) <= Tolerance::DEFAULT.linear
    }
}

impl fmt::Display for V3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for V3D {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl From<Vec3> for V3D {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<V3D> for Vec3 {
    fn from(v: V3D) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for V3D {
    fn from(p: Point3) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<V3D> for Point3 {
    fn from(v: V3D) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl Add for V3D {
    type Output = V3D;
    fn add(self, rhs: V3D) -> V3D {
        V3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for V3D {
    fn add_assign(&mut self, rhs: V3D) {
        *self = *self + rhs;
    }
}

impl Sub for V3D {
    type Output = V3D;
    fn sub(self, rhs: V3D) -> V3D {
        V3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for V3D {
    fn sub_assign(&mut self, rhs: V3D) {
        *self = *self - rhs;
    }
}

impl Neg for V3D {
    type Output = V3D;
    fn neg(self) -> V3D {
        V3D::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for V3D {
    type Output = V3D;
    fn mul(self, rhs: f64) -> V3D {
        V3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<V3D> for f64 {
    type Output = V3D;
    fn mul(self, rhs: V3D) -> V3D {
        rhs * self
    }
}

impl MulAssign<f64> for V3D {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

/// `a * b` between two vectors is the cross product.
impl Mul<V3D> for V3D {
    type Output = V3D;
    fn mul(self, rhs: V3D) -> V3D {
        self.cross(&rhs)
    }
}

/// Division by exactly zero leaves the vector unchanged.
impl Div<f64> for V3D {
    type Output = V3D;
    fn div(self, rhs: f64) -> V3D {
        if rhs == 0.0 {
            return self;
        }
        V3D::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl DivAssign<f64> for V3D {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_component_access() {
        let mut v = V3D::new(1.0, 2.0, 3.0);
        assert_eq!(v.component(0), Ok(1.0));
        assert_eq!(v.component(2), Ok(3.0));
        assert_eq!(v.component(3), Err(MathError::IndexOutOfRange(3)));
        v.set_component(1, 7.0).unwrap();
        assert_eq!(v.y, 7.0);
        assert!(v.set_component(5, 1.0).is_err());
        assert_eq!(v, V3D::new(1.0, 7.0, 3.0));
    }

    #[test]
    fn test_from_array() {
        let v = V3D::from([4.0, 5.0, 6.0]);
        assert_eq!(v.to_array(), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_arithmetic() {
        let a = V3D::new(1.0, 2.0, 3.0);
        let b = V3D::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, V3D::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, V3D::new(3.0, 3.0, 3.0));
        assert_eq!(-a, V3D::new(-1.0, -2.0, -3.0));
        assert_eq!(a * 2.0, V3D::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, V3D::new(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, V3D::new(2.0, 2.5, 3.0));
        assert_abs_diff_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn test_divide_by_zero_is_noop() {
        let a = V3D::new(1.0, -2.0, 3.0);
        assert_eq!(a / 0.0, a);
        let mut b = a;
        b /= 0.0;
        assert_eq!(b.to_array(), a.to_array());
    }

    #[test]
    fn test_cross_product_operator() {
        let x = V3D::x_axis();
        let y = V3D::y_axis();
        assert_eq!(x * y, V3D::z_axis());
        assert_eq!(y * x, -V3D::z_axis());
        assert_eq!(x.cross(&y), x * y);
    }

    #[test]
    fn test_tolerance_equality() {
        let a = V3D::new(1.0, 1.0, 1.0);
        assert_eq!(a, V3D::new(1.0 + 5e-9, 1.0, 1.0));
        assert_ne!(a, V3D::new(1.0 + 1e-7, 1.0, 1.0));
    }

    #[test]
    fn test_distance_symmetric() {
        let p = V3D::new(1.0, -4.0, 2.5);
        let q = V3D::new(-3.0, 0.5, 7.0);
        assert_abs_diff_eq!(p.distance(&q), q.distance(&p));
        assert_eq!(p.distance(&p), 0.0);
    }

    #[test]
    fn test_make_unit() {
        let mut v = V3D::new(3.0, 0.0, 4.0);
        let n = v.make_unit();
        assert_abs_diff_eq!(n, 5.0);
        assert_eq!(v, V3D::new(0.6, 0.0, 0.8));

        let mut tiny = V3D::new(1e-9, 0.0, 0.0);
        let n = tiny.make_unit();
        assert_abs_diff_eq!(n, 1e-9);
        assert_eq!(tiny.x, 1e-9);
    }

    #[test]
    fn test_rotate_about_axis_and_origin() {
        let mut p = V3D::new(2.0, 1.0, 0.0);
        p.rotate_about(&V3D::new(1.0, 1.0, 0.0), &V3D::z_axis(), PI / 2.0);
        assert_eq!(p, V3D::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_rotate_by_matrix() {
        let m = Mat3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let mut p = V3D::new(1.0, 0.0, 5.0);
        p.rotate(&m);
        assert_eq!(p, V3D::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_master_dir() {
        assert_eq!(V3D::new(1.0, 0.0, 0.0).master_dir(1e-3), 1);
        assert_eq!(V3D::new(0.0, -2.0, 0.0).master_dir(1e-3), -2);
        assert_eq!(V3D::new(0.0, 0.0, 5.0).master_dir(1e-3), 3);
        assert_eq!(V3D::new(1.0, 0.01, 0.0).master_dir(1e-3), 1);
        assert_eq!(V3D::new(1.0, 1.0, 0.0).master_dir(1e-3), 0);
        assert_eq!(V3D::zero().master_dir(1e-3), 0);
    }

    #[test]
    fn test_re_base() {
        let mut p = V3D::new(1.0, 2.0, 3.0);
        p.re_base(
            &V3D::new(2.0, 0.0, 0.0),
            &V3D::new(0.0, 0.0, 1.0),
            &V3D::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_eq!(p, V3D::new(0.5, 3.0, 2.0));
    }

    #[test]
    fn test_re_base_singular() {
        let mut p = V3D::new(1.0, 2.0, 3.0);
        let result = p.re_base(
            &V3D::new(1.0, 0.0, 0.0),
            &V3D::new(2.0, 0.0, 0.0),
            &V3D::new(0.0, 0.0, 1.0),
        );
        assert!(matches!(result, Err(MathError::SingularBasis(_))));
        assert_eq!(p, V3D::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_co_linear() {
        let a = V3D::new(0.0, 0.0, 0.0);
        assert!(a.co_linear(&V3D::new(1.0, 1.0, 1.0), &V3D::new(-2.0, -2.0, -2.0)));
        assert!(!a.co_linear(&V3D::new(1.0, 1.0, 1.0), &V3D::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_angle() {
        assert_abs_diff_eq!(V3D::x_axis().angle(&V3D::y_axis()), PI / 2.0, epsilon = 1e-12);
        assert_eq!(V3D::zero().angle(&V3D::x_axis()), 0.0);
    }

    #[test]
    fn test_nalgebra_round_trip() {
        let v = V3D::new(1.5, -2.0, 0.25);
        let n: Vec3 = v.into();
        assert_eq!(V3D::from(n), v);
        let p: Point3 = v.into();
        assert_eq!(V3D::from(p), v);
    }
}
