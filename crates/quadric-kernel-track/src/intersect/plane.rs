//! Line-plane intersection (closed-form).

use quadric_kernel_geom::Plane;

use crate::Line;

/// Intersect a line with a plane.
///
/// Returns the line parameter of the crossing, or `None` if the line is
/// parallel to the plane (including lying in it).
pub fn intersect_plane(line: &Line, plane: &Plane) -> Option<f64> {
    let denom = line.direction().dot(&plane.normal());

    if denom.abs() < 1e-12 {
        return None;
    }

    Some(-plane.signed_distance(&line.origin()) / denom)
}
