//! Arbitrary quadric given directly by its coefficients.

use std::any::Any;

use quadric_kernel_math::{Mat3, V3D};

use crate::equation::QuadricEquation;
use crate::error::{GeomError, Result};
use crate::spec::tokenize;
use crate::{Surface, SurfaceKind};

/// A general quadric surface. It has no shape parameters, so transforms act
/// on the equation itself.
#[derive(Debug, Clone, Default)]
pub struct General {
    eqn: QuadricEquation,
}

impl General {
    /// Quadric with coefficients `[A, B, C, D, E, F, G, H, J, K]`.
    pub fn new(coeffs: [f64; 10]) -> Self {
        Self {
            eqn: QuadricEquation::from_coefficients(coeffs),
        }
    }
}

/// Expand the `sq` form `A(x-x̄)² + B(y-ȳ)² + C(z-z̄)² + 2D(x-x̄) + 2E(y-ȳ)
/// + 2F(z-z̄) + G` into full coefficients.
fn special_quadric(v: &[f64]) -> [f64; 10] {
    let (a, b, c, d, e, f, g) = (v[0], v[1], v[2], v[3], v[4], v[5], v[6]);
    let (x, y, z) = (v[7], v[8], v[9]);
    [
        a,
        b,
        c,
        0.0,
        0.0,
        0.0,
        -2.0 * a * x + 2.0 * d,
        -2.0 * b * y + 2.0 * e,
        -2.0 * c * z + 2.0 * f,
        a * x * x + b * y * y + c * z * z - 2.0 * d * x - 2.0 * e * y - 2.0 * f * z + g,
    ]
}

impl Surface for General {
    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::General
    }

    fn class_name(&self) -> &'static str {
        "General"
    }

    fn equation(&self) -> &QuadricEquation {
        &self.eqn
    }

    fn set_name(&mut self, id: i32) {
        self.eqn.set_id(id);
    }

    fn set_surface(&mut self, spec: &str) -> Result<()> {
        let t = tokenize(spec)?;
        t.expect_len(&[10], "10")?;
        let coeffs = match t.keyword.as_str() {
            "gq" => {
                let mut c = [0.0; 10];
                c.copy_from_slice(&t.values);
                c
            }
            "sq" => special_quadric(&t.values),
            other => return Err(GeomError::unknown("general quadric", other)),
        };
        if coeffs.iter().all(|c| *c == 0.0) {
            return Err(GeomError::Degenerate("all quadric coefficients are zero".into()));
        }
        if let Some(id) = t.id {
            self.eqn.set_id(id);
        }
        self.eqn.set_coefficients(coeffs);
        Ok(())
    }

    fn set_base_eqn(&mut self) {}

    fn distance(&self, pt: &V3D) -> f64 {
        self.eqn.first_order_distance(pt)
    }

    fn surface_normal(&self, pt: &V3D) -> V3D {
        self.eqn.normal(pt)
    }

    fn rotate(&mut self, m: &Mat3) {
        if !self.eqn.rotate(m) {
            log::warn!("surface {}: singular rotation matrix ignored", self.name());
        }
    }

    fn displace(&mut self, v: &V3D) {
        self.eqn.displace(v);
    }

    fn spec_string(&self) -> String {
        self.eqn.spec_string()
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
