//! Directed line representation and basic line-geometry tests.

use quadric_kernel_geom::Surface;
use quadric_kernel_math::{Mat3, Tolerance, V3D};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::intersect::line_parameters;

/// An infinite line through `origin` with unit direction `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    origin: V3D,
    direction: V3D,
}

impl Line {
    /// Create a line from origin and direction.
    ///
    /// The direction is normalized; a zero direction is rejected.
    pub fn new(origin: V3D, direction: V3D) -> Result<Self> {
        let mut dir = direction;
        if dir.make_unit() <= Tolerance::DEFAULT.linear {
            return Err(TrackError::ZeroDirection);
        }
        Ok(Self {
            origin,
            direction: dir,
        })
    }

    /// Origin point.
    pub fn origin(&self) -> V3D {
        self.origin
    }

    /// Unit direction.
    pub fn direction(&self) -> V3D {
        self.direction
    }

    /// Evaluate the line at parameter `lambda`: `origin + lambda * direction`.
    #[inline]
    pub fn point_at(&self, lambda: f64) -> V3D {
        self.origin + self.direction * lambda
    }

    /// Perpendicular distance from `pt` to the line.
    pub fn distance(&self, pt: &V3D) -> f64 {
        (*pt - self.origin).cross(&self.direction).norm()
    }

    /// Foot of the perpendicular from `pt`.
    pub fn closest_point(&self, pt: &V3D) -> V3D {
        self.point_at((*pt - self.origin).dot(&self.direction))
    }

    /// True if `pt` lies on the line.
    pub fn is_valid(&self, pt: &V3D) -> bool {
        self.distance(pt) <= Tolerance::DEFAULT.linear
    }

    /// Rotate origin and direction by `m`.
    pub fn rotate(&mut self, m: &Mat3) {
        self.origin.rotate(m);
        self.direction.rotate(m);
        self.direction.make_unit();
    }

    /// Translate the origin by `v`.
    pub fn displace(&mut self, v: &V3D) {
        self.origin += *v;
    }

    /// All points where the infinite line meets `surface`, in ascending
    /// parameter order. A tangent point is reported once.
    pub fn intersect(&self, surface: &dyn Surface) -> Vec<V3D> {
        line_parameters(self, surface)
            .into_iter()
            .map(|lambda| self.point_at(lambda))
            .collect()
    }

    /// Intersections at or ahead of the origin, paired with their parameter.
    pub fn intersect_forward(&self, surface: &dyn Surface) -> Vec<(f64, V3D)> {
        line_parameters(self, surface)
            .into_iter()
            .filter(|lambda| *lambda >= 0.0)
            .map(|lambda| (lambda, self.point_at(lambda)))
            .collect()
    }
}
