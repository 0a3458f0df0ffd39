//! Infinite plane `n·x = d`.

use std::any::Any;

use quadric_kernel_math::{Mat3, Tolerance, V3D};

use crate::equation::QuadricEquation;
use crate::error::{GeomError, Result};
use crate::spec::{axis_letter, axis_name, format_list, format_number, tokenize};
use crate::{Side, Surface, SurfaceKind, AXIS_TOLERANCE};

/// An infinite plane with unit normal `normal` at signed distance `dist`
/// from the origin. Points with `normal·x > dist` are outside.
#[derive(Debug, Clone)]
pub struct Plane {
    eqn: QuadricEquation,
    normal: V3D,
    dist: f64,
}

impl Default for Plane {
    fn default() -> Self {
        Self::new(V3D::x_axis(), 0.0)
    }
}

impl Plane {
    /// Plane `normal·x = dist`. The normal is normalized; a zero normal is kept
    /// as a degenerate plane.
    pub fn new(normal: V3D, dist: f64) -> Self {
        let mut plane = Self {
            eqn: QuadricEquation::default(),
            normal: V3D::x_axis(),
            dist: 0.0,
        };
        plane.set_plane(normal, dist);
        plane
    }

    /// Plane through `point` with the given normal.
    pub fn from_point_normal(point: &V3D, normal: &V3D) -> Self {
        let n = normal.unit();
        Self::new(n, n.dot(point))
    }

    /// Plane through three points, normal `(b - a) × (c - a)`.
    pub fn from_points(a: &V3D, b: &V3D, c: &V3D) -> Result<Self> {
        if a.co_linear(b, c) {
            return Err(GeomError::Degenerate(format!(
                "plane points {a}, {b}, {c} are collinear"
            )));
        }
        let normal = (*b - *a).cross(&(*c - *a));
        Ok(Self::from_point_normal(a, &normal))
    }

    /// Unit normal.
    pub fn normal(&self) -> V3D {
        self.normal
    }

    /// Signed distance of the plane from the origin along the normal.
    pub fn dist(&self) -> f64 {
        self.dist
    }

    /// Replace normal and distance.
    pub fn set_plane(&mut self, normal: V3D, dist: f64) {
        let mut n = normal;
        let size = n.make_unit();
        self.normal = n;
        self.dist = if size > Tolerance::DEFAULT.linear {
            dist / size
        } else {
            dist
        };
        self.set_base_eqn();
    }

    /// `normal · pt`.
    pub fn dot_prod(&self, pt: &V3D) -> f64 {
        self.normal.dot(pt)
    }

    /// Signed distance from `pt` to the plane (positive outside).
    pub fn signed_distance(&self, pt: &V3D) -> f64 {
        self.dot_prod(pt) - self.dist
    }

    /// Mirror image of `pt` in the plane.
    pub fn reflect(&self, pt: &V3D) -> V3D {
        *pt - self.normal * (2.0 * self.signed_distance(pt))
    }

    /// 1, 2 or 3 if the normal is the +x, +y or +z axis, otherwise 0.
    pub fn plane_type(&self) -> usize {
        match self.normal.master_dir(AXIS_TOLERANCE) {
            d if d > 0 => d as usize,
            _ => 0,
        }
    }
}

impl Surface for Plane {
    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Plane
    }

    fn class_name(&self) -> &'static str {
        "Plane"
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
        let (normal, dist) = match t.keyword.as_str() {
            "px" | "py" | "pz" => {
                t.expect_len(&[1], "1")?;
                let axis = axis_letter(&t.keyword).unwrap_or(0);
                let mut n = V3D::zero();
                n.set_component(axis, 1.0)
                    .map_err(|e| GeomError::Degenerate(e.to_string()))?;
                (n, v[0])
            }
            "p" => {
                t.expect_len(&[4, 9], "4 or 9")?;
                if v.len() == 4 {
                    let n = V3D::new(v[0], v[1], v[2]);
                    if n.null_vector(Tolerance::DEFAULT.linear) {
                        return Err(GeomError::Degenerate("plane normal is zero".into()));
                    }
                    (n, v[3])
                } else {
                    let p = Self::from_points(
                        &V3D::new(v[0], v[1], v[2]),
                        &V3D::new(v[3], v[4], v[5]),
                        &V3D::new(v[6], v[7], v[8]),
                    )?;
                    (p.normal, p.dist)
                }
            }
            other => return Err(GeomError::unknown("plane", other)),
        };
        if let Some(id) = t.id {
            self.eqn.set_id(id);
        }
        self.set_plane(normal, dist);
        Ok(())
    }

    fn set_base_eqn(&mut self) {
        let n = self.normal;
        self.eqn.set_coefficients([
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, n.x, n.y, n.z, -self.dist,
        ]);
    }

    fn side(&self, pt: &V3D) -> Side {
        Side::from_value(self.signed_distance(pt), Tolerance::DEFAULT.surface)
    }

    fn distance(&self, pt: &V3D) -> f64 {
        self.signed_distance(pt).abs()
    }

    fn surface_normal(&self, _pt: &V3D) -> V3D {
        self.normal
    }

    fn rotate(&mut self, m: &Mat3) {
        let mut n = self.normal;
        n.rotate(m);
        self.set_plane(n, self.dist);
    }

    fn displace(&mut self, v: &V3D) {
        self.dist += self.normal.dot(v);
        self.set_base_eqn();
    }

    fn spec_string(&self) -> String {
        match self.plane_type() {
            0 => format!(
                "p {}",
                format_list(&[self.normal.x, self.normal.y, self.normal.z, self.dist])
            ),
            axis => format!("p{} {}", axis_name(axis - 1), format_number(self.dist)),
        }
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
