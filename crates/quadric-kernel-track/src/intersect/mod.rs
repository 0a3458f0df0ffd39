//! Line-surface intersection algorithms.
//!
//! Planes use the closed linear form; every other surface is solved as a
//! quadratic in the line parameter from its equation. Points on an excluded
//! cone sheet are dropped.

mod plane;
mod quadric;

pub use plane::intersect_plane;
pub use quadric::intersect_quadric;

use quadric_kernel_geom::{Plane, Surface, SurfaceKind};
use quadric_kernel_math::Tolerance;

use crate::Line;

/// Line parameters of every intersection with `surface`, ascending and
/// without duplicates.
pub fn line_parameters(line: &Line, surface: &dyn Surface) -> Vec<f64> {
    let mut params = match surface.surface_type() {
        SurfaceKind::Plane => match surface.as_any().downcast_ref::<Plane>() {
            Some(plane) => intersect_plane(line, plane).into_iter().collect(),
            None => intersect_quadric(line, surface.equation()),
        },
        SurfaceKind::Sphere
        | SurfaceKind::Cylinder
        | SurfaceKind::Cone
        | SurfaceKind::General => intersect_quadric(line, surface.equation()),
    };
    params.retain(|lambda| surface.on_sheet(&line.point_at(*lambda)));
    params.sort_by(|a, b| a.total_cmp(b));
    params.dedup_by(|a, b| (*a - *b).abs() <= Tolerance::DEFAULT.linear);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadric_kernel_geom::surface_from_spec;
    use quadric_kernel_math::V3D;

    #[test]
    fn test_single_sheet_cone_filters() {
        let line = Line::new(V3D::new(-5.0, 0.0, 2.0), V3D::x_axis()).unwrap();
        let double = surface_from_spec("kz 0 1").unwrap();
        let params = line_parameters(&line, double.as_ref());
        assert_eq!(params.len(), 2);
        assert!((params[0] - 3.0).abs() < 1e-9);
        assert!((params[1] - 7.0).abs() < 1e-9);

        let lower = surface_from_spec("kz 0 1 -1").unwrap();
        assert!(line_parameters(&line, lower.as_ref()).is_empty());
    }

    #[test]
    fn test_general_quadric() {
        let line = Line::new(V3D::new(0.0, 0.0, -10.0), V3D::z_axis()).unwrap();
        let ellipsoid = surface_from_spec("gq 1 1 0.25 0 0 0 0 0 0 -1").unwrap();
        let params = line_parameters(&line, ellipsoid.as_ref());
        assert_eq!(params.len(), 2);
        assert!((params[0] - 8.0).abs() < 1e-9);
        assert!((params[1] - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_dispatch_ordering() {
        let line = Line::new(V3D::new(10.0, 0.0, 0.0), -V3D::x_axis()).unwrap();
        let sphere = surface_from_spec("s 1 0 0 2").unwrap();
        let params = line_parameters(&line, sphere.as_ref());
        assert!((params[0] - 7.0).abs() < 1e-12);
        assert!((params[1] - 11.0).abs() < 1e-12);
    }
}
