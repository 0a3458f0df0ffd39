//! Cells bounded by an intersection of surface half-spaces.

use quadric_kernel_geom::{Side, Surface};
use quadric_kernel_math::{Tolerance, V3D};

use crate::error::{Result, TrackError};
use crate::track::{Crossing, Track};

/// One bounding surface and the side of it the region keeps.
#[derive(Debug, Clone)]
pub struct HalfSpace {
    /// The bounding surface.
    pub surface: Box<dyn Surface>,
    /// `Inside` keeps the negative side, `Outside` the positive side.
    pub sense: Side,
}

impl HalfSpace {
    /// True if `pt` is on the kept side or on the surface.
    pub fn contains(&self, pt: &V3D) -> bool {
        let side = self.surface.side(pt);
        side == Side::On || side == self.sense
    }
}

/// A region: the points that lie in every half-space.
#[derive(Debug, Clone)]
pub struct Region {
    id: i32,
    half_spaces: Vec<HalfSpace>,
}

impl Region {
    /// Region `id` bounded by `half_spaces`.
    pub fn new(id: i32, half_spaces: Vec<HalfSpace>) -> Self {
        Self { id, half_spaces }
    }

    /// Build a region from a cell description such as `"-1 2 -3"`.
    ///
    /// Each token is a signed surface number: negative keeps the inside of
    /// the surface, positive the outside. Surfaces are looked up by name in
    /// `surfaces` and cloned.
    pub fn from_cell(id: i32, cell: &str, surfaces: &[Box<dyn Surface>]) -> Result<Self> {
        let mut half_spaces = Vec::new();
        for token in cell.split_whitespace() {
            let signed: i32 = token
                .parse()
                .map_err(|_| TrackError::BadCell(cell.to_string()))?;
            if signed == 0 {
                return Err(TrackError::BadCell(cell.to_string()));
            }
            let name = signed.abs();
            let surface = surfaces
                .iter()
                .find(|s| s.name() == name)
                .ok_or(TrackError::UnknownSurface(name))?;
            half_spaces.push(HalfSpace {
                surface: surface.clone(),
                sense: if signed < 0 { Side::Inside } else { Side::Outside },
            });
        }
        if half_spaces.is_empty() {
            return Err(TrackError::BadCell(cell.to_string()));
        }
        Ok(Self::new(id, half_spaces))
    }

    /// Region number.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Bounding half-spaces.
    pub fn half_spaces(&self) -> &[HalfSpace] {
        &self.half_spaces
    }

    /// True if `pt` is inside or on the boundary.
    pub fn is_inside(&self, pt: &V3D) -> bool {
        self.half_spaces.iter().all(|h| h.contains(pt))
    }

    /// True if `pt` is inside and on at least one bounding surface.
    pub fn is_on_side(&self, pt: &V3D) -> bool {
        self.is_inside(pt) && self.half_spaces.iter().any(|h| h.surface.on_surface(pt))
    }

    /// Cell description, e.g. `"-1 2"`.
    pub fn cell_string(&self) -> String {
        self.half_spaces
            .iter()
            .map(|h| {
                let name = h.surface.name();
                if h.sense == Side::Inside {
                    (-name).to_string()
                } else {
                    name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Add the crossings of this region ahead of the track origin to `track`.
    ///
    /// Each boundary hit is probed just before and after; only hits where
    /// membership changes are recorded. Hits closer together than the
    /// crossing tolerance count once, and hits within that tolerance of the
    /// origin are ignored. Returns the number of crossings added.
    pub fn intercept(&self, track: &mut Track) -> usize {
        let tol = Tolerance::DEFAULT.crossing;
        let probe = 0.5 * tol;
        let line = *track.line();

        let mut hits: Vec<f64> = self
            .half_spaces
            .iter()
            .flat_map(|h| line.intersect_forward(h.surface.as_ref()))
            .map(|(lambda, _)| lambda)
            .filter(|lambda| *lambda > tol)
            .collect();
        hits.sort_by(|a, b| a.total_cmp(b));
        hits.dedup_by(|a, b| (*a - *b).abs() <= tol);

        let mut added = 0;
        for lambda in hits {
            let before = self.is_inside(&line.point_at(lambda - probe));
            let after = self.is_inside(&line.point_at(lambda + probe));
            let crossing = match (before, after) {
                (false, true) => Crossing::Enter,
                (true, false) => Crossing::Leave,
                _ => continue,
            };
            track.add_point(self.id, crossing, line.point_at(lambda));
            added += 1;
        }
        log::debug!("region {}: {} crossings", self.id, added);
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadric_kernel_geom::surface_from_spec;

    fn surfaces() -> Vec<Box<dyn Surface>> {
        ["1 so 10", "2 cz 2", "3 pz 0", "4 px 5"]
            .iter()
            .map(|s| surface_from_spec(s).unwrap())
            .collect()
    }

    #[test]
    fn test_from_cell() {
        let region = Region::from_cell(5, "-1  2 -3", &surfaces()).unwrap();
        assert_eq!(region.id(), 5);
        assert_eq!(region.half_spaces().len(), 3);
        assert_eq!(region.cell_string(), "-1 2 -3");
    }

    #[test]
    fn test_from_cell_errors() {
        let s = surfaces();
        assert_eq!(
            Region::from_cell(1, "-1 9", &s).unwrap_err(),
            TrackError::UnknownSurface(9)
        );
        assert!(matches!(Region::from_cell(1, "-1 x", &s), Err(TrackError::BadCell(_))));
        assert!(matches!(Region::from_cell(1, "0", &s), Err(TrackError::BadCell(_))));
        assert!(matches!(Region::from_cell(1, "  ", &s), Err(TrackError::BadCell(_))));
    }

    #[test]
    fn test_is_inside() {
        // ball minus a cylinder core, lower half
        let region = Region::from_cell(5, "-1 2 -3", &surfaces()).unwrap();
        assert!(region.is_inside(&V3D::new(5.0, 0.0, -1.0)));
        assert!(!region.is_inside(&V3D::new(0.0, 0.0, -1.0)));
        assert!(!region.is_inside(&V3D::new(5.0, 0.0, 1.0)));
        assert!(!region.is_inside(&V3D::new(20.0, 0.0, -1.0)));
        // boundary counts as inside
        assert!(region.is_inside(&V3D::new(5.0, 0.0, 0.0)));
        assert!(region.is_on_side(&V3D::new(5.0, 0.0, 0.0)));
        assert!(!region.is_on_side(&V3D::new(5.0, 0.0, -1.0)));
    }

    #[test]
    fn test_intercept_ball() {
        let region = Region::from_cell(1, "-1", &surfaces()).unwrap();
        let mut track = Track::new(V3D::new(-20.0, 0.0, 0.0), V3D::x_axis(), 0).unwrap();
        assert_eq!(region.intercept(&mut track), 2);
        let p = track.partials();
        assert_eq!(p[0].crossing, Crossing::Enter);
        assert_eq!(p[0].point, V3D::new(-10.0, 0.0, 0.0));
        assert_eq!(p[1].crossing, Crossing::Leave);
        assert_eq!(p[1].point, V3D::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_intercept_skips_internal_boundaries() {
        // the plane px 5 only bounds the region beyond x = 5
        let region = Region::from_cell(2, "-1 -4", &surfaces()).unwrap();
        let mut track = Track::new(V3D::new(-20.0, 0.0, 0.0), V3D::x_axis(), 0).unwrap();
        assert_eq!(region.intercept(&mut track), 2);
        assert_eq!(track.partials()[1].point, V3D::new(5.0, 0.0, 0.0));

        let mut along_y = Track::new(V3D::new(0.0, -20.0, 0.0), V3D::y_axis(), 0).unwrap();
        assert_eq!(region.intercept(&mut along_y), 2);
        assert_eq!(along_y.partials()[1].point, V3D::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_intercept_corner_counted_once() {
        // leaving through the rim where sphere and plane meet
        let s: Vec<Box<dyn Surface>> = ["1 so 1", "2 pz 0"]
            .iter()
            .map(|s| surface_from_spec(s).unwrap())
            .collect();
        let region = Region::from_cell(3, "-1 -2", &s).unwrap();
        let dir = V3D::new(1.0, 0.0, 1.0);
        let mut track = Track::new(V3D::new(0.0, 0.0, -1.0), dir, 3).unwrap();
        assert_eq!(region.intercept(&mut track), 1);
        assert_eq!(track.partials()[0].crossing, Crossing::Leave);
        assert_eq!(track.partials()[0].point, V3D::new(1.0, 0.0, 0.0));
    }
}
