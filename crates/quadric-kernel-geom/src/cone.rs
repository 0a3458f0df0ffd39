//! Circular cone, double-napped or restricted to one sheet.

use std::any::Any;

use quadric_kernel_math::{Mat3, Tolerance, V3D};

use crate::equation::QuadricEquation;
use crate::error::{GeomError, Result};
use crate::spec::{axis_letter, axis_name, format_list, tokenize};
use crate::{Side, Surface, SurfaceKind, AXIS_TOLERANCE};

/// A cone with apex `apex`, unit axis `normal` and half-angle `half_angle`.
///
/// `cut_flag` selects a single nappe: `1` keeps the sheet along `+normal`,
/// `-1` the sheet along `-normal`, `0` keeps both. The equation always
/// describes the double cone.
#[derive(Debug, Clone)]
pub struct Cone {
    eqn: QuadricEquation,
    apex: V3D,
    normal: V3D,
    half_angle: f64,
    cangle: f64,
    cut_flag: i32,
}

impl Default for Cone {
    fn default() -> Self {
        Self::new(V3D::zero(), V3D::z_axis(), 0.0)
    }
}

impl Cone {
    /// Double cone with half-angle in radians.
    pub fn new(apex: V3D, axis: V3D, half_angle: f64) -> Self {
        let mut cone = Self {
            eqn: QuadricEquation::default(),
            apex,
            normal: V3D::z_axis(),
            half_angle,
            cangle: half_angle.cos(),
            cut_flag: 0,
        };
        cone.set_norm(axis);
        cone
    }

    /// Apex point.
    pub fn apex(&self) -> V3D {
        self.apex
    }

    /// Unit axis direction.
    pub fn normal(&self) -> V3D {
        self.normal
    }

    /// Half-angle in radians.
    pub fn half_angle(&self) -> f64 {
        self.half_angle
    }

    /// Cosine of the half-angle.
    pub fn cos_angle(&self) -> f64 {
        self.cangle
    }

    /// `tan²` of the half-angle.
    pub fn tan_squared(&self) -> f64 {
        let t = self.half_angle.tan();
        t * t
    }

    /// Sheet selector: `-1`, `0` or `1`.
    pub fn cut_flag(&self) -> i32 {
        self.cut_flag
    }

    /// Move the apex.
    pub fn set_apex(&mut self, apex: V3D) {
        self.apex = apex;
        self.set_base_eqn();
    }

    /// Change the axis direction. A zero vector is ignored.
    pub fn set_norm(&mut self, axis: V3D) {
        let mut n = axis;
        if n.make_unit() > Tolerance::DEFAULT.linear {
            self.normal = n;
        }
        self.set_base_eqn();
    }

    /// Set the half-angle in radians.
    pub fn set_angle(&mut self, half_angle: f64) {
        self.half_angle = half_angle;
        self.cangle = half_angle.cos();
        self.set_base_eqn();
    }

    /// Set the half-angle from `tan²`.
    pub fn set_tan_squared(&mut self, t2: f64) {
        self.set_angle(t2.max(0.0).sqrt().atan());
    }

    /// Restrict to one sheet (`±1`) or keep both (`0`).
    pub fn set_cut_flag(&mut self, flag: i32) {
        self.cut_flag = flag.signum();
    }

    /// Signed distance-like displacement: negative inside the cone.
    fn displacement(&self, pt: &V3D) -> f64 {
        let r = *pt - self.apex;
        let len = r.norm();
        if len <= Tolerance::DEFAULT.linear {
            return 0.0;
        }
        let cos = (r.dot(&self.normal) / len).abs().min(1.0);
        len * (cos.acos() - self.half_angle).sin()
    }
}

impl Surface for Cone {
    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Cone
    }

    fn class_name(&self) -> &'static str {
        "Cone"
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
        let mut apex = [0.0; 3];
        let rest = match t.keyword.as_str() {
            "kx" | "ky" | "kz" => {
                t.expect_len(&[2, 3], "2 or 3")?;
                apex[axis] = v[0];
                &v[1..]
            }
            "k/x" | "k/y" | "k/z" => {
                t.expect_len(&[4, 5], "4 or 5")?;
                apex = [v[0], v[1], v[2]];
                &v[3..]
            }
            other => return Err(GeomError::unknown("cone", other)),
        };
        let t2 = rest[0];
        if t2 <= 0.0 {
            return Err(GeomError::Degenerate(format!(
                "cone tan² {t2} must be positive"
            )));
        }
        let sheet = match rest.get(1) {
            None => 0,
            Some(&s) if s == 1.0 => 1,
            Some(&s) if s == -1.0 => -1,
            Some(&s) => {
                return Err(GeomError::Degenerate(format!(
                    "cone sheet {s} must be +1 or -1"
                )))
            }
        };
        if let Some(id) = t.id {
            self.eqn.set_id(id);
        }
        let mut normal = [0.0; 3];
        normal[axis] = 1.0;
        self.apex = V3D::from(apex);
        self.normal = V3D::from(normal);
        self.cut_flag = sheet;
        self.set_tan_squared(t2);
        Ok(())
    }

    fn set_base_eqn(&mut self) {
        // c²|x - a|² - ((x - a)·n)²
        let n = self.normal;
        let a = self.apex;
        let c2 = self.cangle * self.cangle;
        let a_dot_n = a.dot(&n);
        self.eqn.set_coefficients([
            c2 - n.x * n.x,
            c2 - n.y * n.y,
            c2 - n.z * n.z,
            -2.0 * n.x * n.y,
            -2.0 * n.x * n.z,
            -2.0 * n.y * n.z,
            2.0 * (n.x * a_dot_n - c2 * a.x),
            2.0 * (n.y * a_dot_n - c2 * a.y),
            2.0 * (n.z * a_dot_n - c2 * a.z),
            c2 * a.norm2() - a_dot_n * a_dot_n,
        ]);
    }

    fn side(&self, pt: &V3D) -> Side {
        if !self.on_sheet(pt) {
            return Side::Outside;
        }
        Side::from_value(self.displacement(pt), Tolerance::DEFAULT.surface)
    }

    fn distance(&self, pt: &V3D) -> f64 {
        self.displacement(pt).abs()
    }

    fn surface_normal(&self, pt: &V3D) -> V3D {
        self.eqn.normal(pt)
    }

    fn on_sheet(&self, pt: &V3D) -> bool {
        if self.cut_flag == 0 {
            return true;
        }
        let along = (*pt - self.apex).dot(&self.normal) * self.cut_flag as f64;
        along >= -Tolerance::DEFAULT.linear
    }

    fn rotate(&mut self, m: &Mat3) {
        self.apex.rotate(m);
        let mut n = self.normal;
        n.rotate(m);
        self.set_norm(n);
    }

    fn displace(&mut self, v: &V3D) {
        self.apex += *v;
        self.set_base_eqn();
    }

    fn spec_string(&self) -> String {
        let dir = self.normal.master_dir(AXIS_TOLERANCE);
        if dir == 0 {
            return self.eqn.spec_string();
        }
        let axis = (dir.unsigned_abs() - 1) as usize;
        let mut values = Vec::with_capacity(5);
        let off_axis = (0..3)
            .filter(|&i| i != axis)
            .any(|i| self.apex.to_array()[i].abs() > Tolerance::DEFAULT.linear);
        let keyword = if off_axis {
            values.extend_from_slice(&self.apex.to_array());
            format!("k/{}", axis_name(axis))
        } else {
            values.push(self.apex.to_array()[axis]);
            format!("k{}", axis_name(axis))
        };
        values.push(self.tan_squared());
        if self.cut_flag != 0 {
            values.push((self.cut_flag * dir.signum()) as f64);
        }
        format!("{} {}", keyword, format_list(&values))
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quadric_kernel_math::{rotation_about_axis, rotation_y};
    use std::f64::consts::{FRAC_PI_4, PI};

    fn cone(spec: &str) -> Cone {
        let mut c = Cone::default();
        c.set_surface(spec).unwrap();
        c
    }

    #[test]
    fn test_kz_side() {
        let c = cone("kz 0 1");
        assert_abs_diff_eq!(c.half_angle(), FRAC_PI_4, epsilon = 1e-12);
        assert_eq!(c.side(&V3D::zero()), Side::On);
        assert_eq!(c.side(&V3D::new(0.0, 0.0, 5.0)), Side::Inside);
        assert_eq!(c.side(&V3D::new(0.0, 0.0, -5.0)), Side::Inside);
        assert_eq!(c.side(&V3D::new(5.0, 0.0, 1.0)), Side::Outside);
        assert_eq!(c.side(&V3D::new(1.0, 0.0, 1.0)), Side::On);
        assert_eq!(c.side(&V3D::new(0.0, 3.0, -3.0)), Side::On);
    }

    #[test]
    fn test_side_agrees_with_equation() {
        let c = cone("k/y 1 2 -1 0.3");
        for pt in [
            V3D::new(1.0, 8.0, -1.0),
            V3D::new(4.0, 2.5, 0.0),
            V3D::new(-2.0, -5.0, 3.0),
            V3D::new(1.2, -7.0, -0.5),
        ] {
            assert_eq!(c.side(&pt), c.equation().side(&pt), "{pt}");
        }
    }

    #[test]
    fn test_single_sheet() {
        let c = cone("kz 0 1 1");
        assert_eq!(c.cut_flag(), 1);
        assert_eq!(c.side(&V3D::new(0.0, 0.0, 5.0)), Side::Inside);
        assert_eq!(c.side(&V3D::new(0.0, 0.0, -5.0)), Side::Outside);
        assert!(c.on_sheet(&V3D::new(1.0, 0.0, 1.0)));
        assert!(!c.on_sheet(&V3D::new(1.0, 0.0, -1.0)));
        // the equation does not know about sheets
        assert_eq!(c.equation().side(&V3D::new(0.0, 0.0, -5.0)), Side::Inside);
    }

    #[test]
    fn test_distance() {
        let c = cone("kz 0 1");
        assert_abs_diff_eq!(c.distance(&V3D::new(2.0, 0.0, 0.0)), 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(c.distance(&V3D::new(1.0, 0.0, 1.0)), 0.0, epsilon = 1e-12);
        for pt in [
            V3D::new(2.0, 0.0, 0.0),
            V3D::new(3.0, 1.0, -2.0),
            V3D::new(0.5, 0.2, 4.0),
        ] {
            assert_abs_diff_eq!(c.distance(&pt), c.distance_true(&pt), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_surface_normal() {
        let c = cone("kz 0 1");
        assert_eq!(c.surface_normal(&V3D::zero()), V3D::zero());
        let n = c.surface_normal(&V3D::new(1.0, 0.0, 1.0));
        assert_abs_diff_eq!(n.x, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_abs_diff_eq!(n.z, -std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_write_forms() {
        assert_eq!(cone("kx 2 0.25").spec_string(), "kx 2 0.25");
        assert_eq!(cone("k/z 1 0 -3 4 -1").spec_string(), "k/z 1 0 -3 4 -1");
        let mut c = cone("kz 0 1 1");
        c.rotate(&rotation_y(PI));
        assert_eq!(c.spec_string(), "kz 0 1 -1");
        assert_eq!(c.side(&V3D::new(0.0, 0.0, -5.0)), Side::Inside);
    }

    #[test]
    fn test_general_axis_writes_gq() {
        let mut c = cone("kz 0 1");
        c.rotate(&rotation_about_axis(&V3D::x_axis(), 0.3));
        assert!(c.spec_string().starts_with("gq "));
        let axis_pt = c.normal() * 4.0;
        assert_eq!(c.side(&axis_pt), Side::Inside);
    }

    #[test]
    fn test_setters() {
        let mut c = Cone::new(V3D::zero(), V3D::x_axis(), 0.1);
        c.set_angle(FRAC_PI_4);
        assert_abs_diff_eq!(c.tan_squared(), 1.0, epsilon = 1e-12);
        assert_eq!(c.equation().side(&V3D::new(2.0, 2.0, 0.0)), Side::On);
        c.set_tan_squared(3.0);
        assert_abs_diff_eq!(c.half_angle(), PI / 3.0, epsilon = 1e-12);
        c.set_apex(V3D::new(1.0, 0.0, 0.0));
        assert_eq!(c.equation().side(&V3D::new(2.0, 3.0_f64.sqrt(), 0.0)), Side::On);
        c.displace(&V3D::new(-1.0, 0.0, 0.0));
        assert_eq!(c.apex(), V3D::zero());
    }

    #[test]
    fn test_bad_specs() {
        let mut c = cone("kz 0 1");
        assert!(matches!(c.set_surface("kz 1"), Err(GeomError::WrongArity { .. })));
        assert!(matches!(c.set_surface("kz 1 0"), Err(GeomError::Degenerate(_))));
        assert!(matches!(c.set_surface("kz 1 1 2"), Err(GeomError::Degenerate(_))));
        assert_eq!(c.spec_string(), "kz 0 1");
    }
}
