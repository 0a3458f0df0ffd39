#![warn(missing_docs)]

//! Quadric surface types for the quadric kernel.
//!
//! Every surface is an implicit quadric
//! `Ax² + By² + Cz² + Dxy + Exz + Fyz + Gx + Hy + Jz + K = 0` held in a
//! [`QuadricEquation`]. The specialised variants ([`Plane`], [`Sphere`],
//! [`Cylinder`], [`Cone`]) keep their shape parameters alongside the
//! equation and regenerate the coefficients whenever a parameter changes;
//! [`General`] is the bare equation.
//!
//! Surfaces are built from MCNP-style specification lines:
//!
//! ```
//! use quadric_kernel_geom::{surface_from_spec, Side};
//! use quadric_kernel_math::V3D;
//!
//! let cyl = surface_from_spec("cx 2.0").unwrap();
//! assert_eq!(cyl.side(&V3D::new(100.0, 0.0, 0.0)), Side::Inside);
//! assert_eq!(cyl.side(&V3D::new(0.0, 2.0, 0.0)), Side::On);
//! assert_eq!(cyl.write(), "-1 cx 2");
//! ```

use std::any::Any;
use std::fmt;

use quadric_kernel_math::{Mat3, V3D};
use serde::{Deserialize, Serialize};

mod cone;
mod cylinder;
mod equation;
pub mod error;
mod general;
mod plane;
mod spec;
mod sphere;

pub use cone::Cone;
pub use cylinder::Cylinder;
pub use equation::{solve_quadratic, QuadricEquation, UNSET_ID};
pub use error::{GeomError, Result};
pub use general::General;
pub use plane::Plane;
pub use spec::{format_number, surface_from_spec, PRECISION};
pub use sphere::Sphere;

/// Relative tolerance used by [`V3D::master_dir`] to recognise an axis-aligned direction.
pub const AXIS_TOLERANCE: f64 = 1e-16;

// =============================================================================
// Side
// =============================================================================

/// Which side of a surface a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Negative side of the equation.
    Inside,
    /// On the surface within tolerance.
    On,
    /// Positive side of the equation.
    Outside,
}

impl Side {
    /// Classify a signed value with an absolute tolerance.
    pub fn from_value(value: f64, tol: f64) -> Self {
        if value.abs() <= tol {
            Side::On
        } else if value > 0.0 {
            Side::Outside
        } else {
            Side::Inside
        }
    }

    /// `-1`, `0` or `+1`.
    pub fn value(self) -> i32 {
        match self {
            Side::Inside => -1,
            Side::On => 0,
            Side::Outside => 1,
        }
    }

    /// The opposite side (`On` stays `On`).
    pub fn flip(self) -> Self {
        match self {
            Side::Inside => Side::Outside,
            Side::On => Side::On,
            Side::Outside => Side::Inside,
        }
    }
}

// =============================================================================
// Surface trait
// =============================================================================

/// The kind of a surface (for match-based dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Infinite plane.
    Plane,
    /// Sphere.
    Sphere,
    /// Infinite cylinder.
    Cylinder,
    /// Double (or single sheet) cone.
    Cone,
    /// Arbitrary quadric.
    General,
}

/// An implicit quadric surface.
pub trait Surface: Send + Sync + fmt::Debug {
    /// The kind of this surface.
    fn surface_type(&self) -> SurfaceKind;

    /// Diagnostic type tag, e.g. `"Cylinder"`.
    fn class_name(&self) -> &'static str;

    /// The current equation.
    fn equation(&self) -> &QuadricEquation;

    /// Surface number.
    fn name(&self) -> i32 {
        self.equation().id()
    }

    /// Set the surface number.
    fn set_name(&mut self, id: i32);

    /// Configure from a specification line. Nothing changes on error.
    fn set_surface(&mut self, spec: &str) -> Result<()>;

    /// Recompute the equation from the shape parameters.
    fn set_base_eqn(&mut self);

    /// Classify a point: inside is the negative side.
    fn side(&self, pt: &V3D) -> Side {
        self.equation().side(pt)
    }

    /// True if `pt` lies on the surface within tolerance.
    fn on_surface(&self, pt: &V3D) -> bool {
        self.side(pt) == Side::On
    }

    /// Fast distance from `pt` to the surface.
    fn distance(&self, pt: &V3D) -> f64;

    /// Exact perpendicular distance from `pt` to the surface.
    fn distance_true(&self, pt: &V3D) -> f64 {
        self.equation().distance_true(pt)
    }

    /// Outward unit normal at (or near) `pt`; may be the zero vector.
    fn surface_normal(&self, pt: &V3D) -> V3D;

    /// Whether `pt` belongs to the part of the quadric this surface keeps.
    ///
    /// Only single-sheet cones reject points.
    fn on_sheet(&self, _pt: &V3D) -> bool {
        true
    }

    /// Rotate by `m` (points map to `m·p`).
    fn rotate(&mut self, m: &Mat3);

    /// Translate by `v`.
    fn displace(&mut self, v: &V3D);

    /// Keyword and parameters, e.g. `"c/y 0 0 1"`.
    fn spec_string(&self) -> String;

    /// `"<id> <keyword> <parameters>"`.
    fn write(&self) -> String {
        format!("{} {}", self.name(), self.spec_string())
    }

    /// Clone this surface into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Surface>;

    /// Downcast to a concrete type via `Any`.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Surface> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl fmt::Display for dyn Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.write())
    }
}
