//! Sphere `|x - c|² = r²`.

use std::any::Any;

use quadric_kernel_math::{Mat3, Tolerance, V3D};

use crate::equation::QuadricEquation;
use crate::error::{GeomError, Result};
use crate::spec::{axis_letter, format_list, format_number, tokenize};
use crate::{Side, Surface, SurfaceKind};

/// A sphere defined by centre and radius.
#[derive(Debug, Clone)]
pub struct Sphere {
    eqn: QuadricEquation,
    centre: V3D,
    radius: f64,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(V3D::zero(), 0.0)
    }
}

impl Sphere {
    /// Create a sphere.
    pub fn new(centre: V3D, radius: f64) -> Self {
        let mut sphere = Self {
            eqn: QuadricEquation::default(),
            centre,
            radius,
        };
        sphere.set_base_eqn();
        sphere
    }

    /// Centre of the sphere.
    pub fn centre(&self) -> V3D {
        self.centre
    }

    /// Radius of the sphere.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Move the centre.
    pub fn set_centre(&mut self, centre: V3D) {
        self.centre = centre;
        self.set_base_eqn();
    }

    /// Change the radius.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.set_base_eqn();
    }
}

impl Surface for Sphere {
    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Sphere
    }

    fn class_name(&self) -> &'static str {
        "Sphere"
    }

    fn equation(&self) -> &QuadricEquation {
        &self.eqn
    }

    fn set_name(&mut self, id: i32) {
        self.eqn.set_id(id);
    }

    fn set_surface(&mut self, spec: &str) -> Result<()> {
        let t = tokenize(spec)?;
        let v = &t.values;
        let (centre, radius) = match t.keyword.as_str() {
            "so" => {
                t.expect_len(&[1], "1")?;
                (V3D::zero(), v[0])
            }
            "s" => {
                t.expect_len(&[4], "4")?;
                (V3D::new(v[0], v[1], v[2]), v[3])
            }
            "sx" | "sy" | "sz" => {
                t.expect_len(&[2], "2")?;
                let mut c = V3D::zero();
                c.set_component(axis_letter(&t.keyword).unwrap_or(0), v[0])
                    .map_err(|e| GeomError::Degenerate(e.to_string()))?;
                (c, v[1])
            }
            other => return Err(GeomError::unknown("sphere", other)),
        };
        if radius <= 0.0 {
            return Err(GeomError::Degenerate(format!(
                "sphere radius {radius} must be positive"
            )));
        }
        if let Some(id) = t.id {
            self.eqn.set_id(id);
        }
        self.centre = centre;
        self.radius = radius;
        self.set_base_eqn();
        Ok(())
    }

    fn set_base_eqn(&mut self) {
        let c = self.centre;
        self.eqn.set_coefficients([
            1.0,
            1.0,
            1.0,
            0.0,
            0.0,
            0.0,
            -2.0 * c.x,
            -2.0 * c.y,
            -2.0 * c.z,
            c.norm2() - self.radius * self.radius,
        ]);
    }

    fn side(&self, pt: &V3D) -> Side {
        let displace = pt.distance(&self.centre) - self.radius;
        Side::from_value(displace, Tolerance::DEFAULT.surface)
    }

    fn distance(&self, pt: &V3D) -> f64 {
        (pt.distance(&self.centre) - self.radius).abs()
    }

    fn surface_normal(&self, pt: &V3D) -> V3D {
        (*pt - self.centre).unit()
    }

    fn rotate(&mut self, m: &Mat3) {
        self.centre.rotate(m);
        self.set_base_eqn();
    }

    fn displace(&mut self, v: &V3D) {
        self.centre += *v;
        self.set_base_eqn();
    }

    fn spec_string(&self) -> String {
        if self.centre.null_vector(Tolerance::DEFAULT.linear) {
            format!("so {}", format_number(self.radius))
        } else {
            let c = self.centre;
            format!("s {}", format_list(&[c.x, c.y, c.z, self.radius]))
        }
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
