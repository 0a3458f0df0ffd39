//! Infinite circular cylinder.

use std::any::Any;

use quadric_kernel_math::{Mat3, Tolerance, V3D};

use crate::equation::QuadricEquation;
use crate::error::{GeomError, Result};
use crate::spec::{axis_letter, axis_name, format_list, format_number, tokenize};
use crate::{Side, Surface, SurfaceKind, AXIS_TOLERANCE};

/// An infinite cylinder: points at distance `radius` from the line through
/// `centre` along `normal`.
///
/// When the axis is a cardinal direction, `nvec` holds its 1-based index and
/// classification skips the general equation.
#[derive(Debug, Clone)]
pub struct Cylinder {
    eqn: QuadricEquation,
    centre: V3D,
    normal: V3D,
    nvec: usize,
    radius: f64,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self::new(V3D::zero(), V3D::z_axis(), 0.0)
    }
}

impl Cylinder {
    /// Cylinder through `centre` along `axis` (normalized).
    pub fn new(centre: V3D, axis: V3D, radius: f64) -> Self {
        let mut cyl = Self {
            eqn: QuadricEquation::default(),
            centre,
            normal: V3D::z_axis(),
            nvec: 3,
            radius,
        };
        cyl.set_norm(axis);
        cyl
    }

    /// A point on the axis.
    pub fn centre(&self) -> V3D {
        self.centre
    }

    /// Unit axis direction.
    pub fn normal(&self) -> V3D {
        self.normal
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// 1-based cardinal axis index, or 0 for a general axis.
    pub fn nvec(&self) -> usize {
        self.nvec
    }

    /// Move the axis through `centre`.
    pub fn set_centre(&mut self, centre: V3D) {
        self.centre = centre;
        self.set_base_eqn();
    }

    /// Change the axis direction. A zero vector is ignored.
    pub fn set_norm(&mut self, axis: V3D) {
        let mut n = axis;
        if n.make_unit() > Tolerance::DEFAULT.linear {
            self.normal = n;
        }
        self.set_nvec();
        self.set_base_eqn();
    }

    /// Change the radius.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.set_base_eqn();
    }

    fn set_nvec(&mut self) {
        let dir = self.normal.master_dir(AXIS_TOLERANCE);
        self.nvec = dir.unsigned_abs() as usize;
        if self.nvec != 0 {
            // snap so the fast path and the equation agree exactly
            let mut axis = [0.0; 3];
            axis[self.nvec - 1] = dir.signum() as f64;
            self.normal = V3D::from(axis);
        }
    }

    /// Component of `pt - centre` perpendicular to the axis.
    fn radial(&self, pt: &V3D) -> V3D {
        let offset = *pt - self.centre;
        offset - self.normal * offset.dot(&self.normal)
    }

    /// The two coordinate indices perpendicular to a cardinal axis.
    fn cross_axes(&self) -> (usize, usize) {
        (self.nvec % 3, (self.nvec + 1) % 3)
    }
}

impl Surface for Cylinder {
    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Cylinder
    }

    fn class_name(&self) -> &'static str {
        "Cylinder"
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
        let axis = axis_letter(&t.keyword).unwrap_or(2);
        let (i, j) = ((axis + 1) % 3, (axis + 2) % 3);
        let mut centre = V3D::zero();
        let radius = match t.keyword.as_str() {
            "cx" | "cy" | "cz" => {
                t.expect_len(&[1], "1")?;
                v[0]
            }
            "c/x" | "c/y" | "c/z" => {
                t.expect_len(&[3], "3")?;
                let (a, b) = (i.min(j), i.max(j));
                let mut c = [0.0; 3];
                c[a] = v[0];
                c[b] = v[1];
                centre = V3D::from(c);
                v[2]
            }
            other => return Err(GeomError::unknown("cylinder", other)),
        };
        if radius <= 0.0 {
            return Err(GeomError::Degenerate(format!(
                "cylinder radius {radius} must be positive"
            )));
        }
        if let Some(id) = t.id {
            self.eqn.set_id(id);
        }
        let mut normal = [0.0; 3];
        normal[axis] = 1.0;
        self.centre = centre;
        self.radius = radius;
        self.set_norm(V3D::from(normal));
        Ok(())
    }

    fn set_base_eqn(&mut self) {
        let c = self.centre;
        let r2 = self.radius * self.radius;
        if self.nvec != 0 {
            let (i, j) = self.cross_axes();
            let ci = c.to_array()[i];
            let cj = c.to_array()[j];
            let mut coeffs = [0.0; 10];
            coeffs[i] = 1.0;
            coeffs[j] = 1.0;
            coeffs[6 + i] = -2.0 * ci;
            coeffs[6 + j] = -2.0 * cj;
            coeffs[9] = ci * ci + cj * cj - r2;
            self.eqn.set_coefficients(coeffs);
            return;
        }
        let n = self.normal;
        let c_dot_n = c.dot(&n);
        self.eqn.set_coefficients([
            1.0 - n.x * n.x,
            1.0 - n.y * n.y,
            1.0 - n.z * n.z,
            -2.0 * n.x * n.y,
            -2.0 * n.x * n.z,
            -2.0 * n.y * n.z,
            2.0 * (n.x * c_dot_n - c.x),
            2.0 * (n.y * c_dot_n - c.y),
            2.0 * (n.z * c_dot_n - c.z),
            c.norm2() - c_dot_n * c_dot_n - r2,
        ]);
    }

    fn side(&self, pt: &V3D) -> Side {
        if self.nvec == 0 {
            return self.eqn.side(pt);
        }
        let (i, j) = self.cross_axes();
        let di = pt.to_array()[i] - self.centre.to_array()[i];
        let dj = pt.to_array()[j] - self.centre.to_array()[j];
        let mut displace = di * di + dj * dj - self.radius * self.radius;
        if self.radius > 0.0 {
            displace /= self.radius;
        }
        Side::from_value(displace, Tolerance::DEFAULT.surface)
    }

    fn distance(&self, pt: &V3D) -> f64 {
        (self.radial(pt).norm() - self.radius).abs()
    }

    fn surface_normal(&self, pt: &V3D) -> V3D {
        self.radial(pt).unit()
    }

    fn rotate(&mut self, m: &Mat3) {
        self.centre.rotate(m);
        let mut n = self.normal;
        n.rotate(m);
        self.set_norm(n);
    }

    fn displace(&mut self, v: &V3D) {
        self.centre += *v;
        self.set_base_eqn();
    }

    fn spec_string(&self) -> String {
        if self.nvec == 0 {
            return self.eqn.spec_string();
        }
        let axis = self.nvec - 1;
        let (i, j) = self.cross_axes();
        let (a, b) = (i.min(j), i.max(j));
        let ca = self.centre.to_array()[a];
        let cb = self.centre.to_array()[b];
        let tol = Tolerance::DEFAULT.linear;
        if ca.abs() <= tol && cb.abs() <= tol {
            format!("c{} {}", axis_name(axis), format_number(self.radius))
        } else {
            format!("c/{} {}", axis_name(axis), format_list(&[ca, cb, self.radius]))
        }
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
