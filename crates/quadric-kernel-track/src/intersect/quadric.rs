//! Line-quadric intersection (quadratic in the line parameter).

use quadric_kernel_geom::{solve_quadratic, QuadricEquation};

use crate::Line;

/// Intersect a line with the quadric `eqn`.
///
/// Substituting `origin + λ·direction` gives `aλ² + bλ + c = 0`. Returns up
/// to two roots, ascending; a tangent root appears once. A line that lies on
/// the surface yields nothing.
pub fn intersect_quadric(line: &Line, eqn: &QuadricEquation) -> Vec<f64> {
    let [a, b, c] = eqn.along_line(&line.origin(), &line.direction());
    solve_quadratic(a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadric_kernel_geom::{surface_from_spec, Surface};
    use quadric_kernel_math::V3D;

    fn params(spec: &str, origin: V3D, dir: V3D) -> Vec<f64> {
        let s = surface_from_spec(spec).unwrap();
        intersect_quadric(&Line::new(origin, dir).unwrap(), s.equation())
    }

    #[test]
    fn test_line_sphere_through_centre() {
        let t = params("so 1", V3D::new(-5.0, 0.0, 0.0), V3D::x_axis());
        assert_eq!(t.len(), 2);
        assert!((t[0] - 4.0).abs() < 1e-12);
        assert!((t[1] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_sphere_miss() {
        let t = params("so 1", V3D::new(-5.0, 2.0, 0.0), V3D::x_axis());
        assert!(t.is_empty());
    }

    #[test]
    fn test_line_cylinder_offset() {
        let t = params("c/z 3 0 1", V3D::zero(), V3D::x_axis());
        assert_eq!(t.len(), 2);
        assert!((t[0] - 2.0).abs() < 1e-12);
        assert!((t[1] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_cylinder_along_axis() {
        let t = params("cz 1", V3D::new(0.5, 0.0, -3.0), V3D::z_axis());
        assert!(t.is_empty());
    }

    #[test]
    fn test_line_cylinder_oblique() {
        let t = params("cz 1", V3D::new(-2.0, 0.0, 0.0), V3D::new(1.0, 0.0, 1.0));
        let s2 = 2.0_f64.sqrt();
        assert_eq!(t.len(), 2);
        assert!((t[0] - s2).abs() < 1e-12);
        assert!((t[1] - 3.0 * s2).abs() < 1e-12);
    }
}
