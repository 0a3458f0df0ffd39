//! Models: numbered surfaces plus the regions built from them.

use std::path::Path;

use quadric_kernel_geom::{surface_from_spec, Surface};
use quadric_kernel_math::{Tolerance, V3D};
use quadric_kernel_track::{Line, Region, Track, VOID_REGION};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A `[[surface]]` table in a model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDef {
    /// Surface number, referenced by cells.
    pub id: i32,
    /// Specification line without the number, e.g. `"so 10"`.
    pub spec: String,
}

/// A `[[region]]` table in a model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDef {
    /// Region number.
    pub id: i32,
    /// Signed surface numbers, e.g. `"-1 2"`.
    pub cell: String,
}

/// The on-disk form of a [`Model`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    /// Surface definitions.
    #[serde(default, rename = "surface")]
    pub surfaces: Vec<SurfaceDef>,
    /// Region definitions.
    #[serde(default, rename = "region")]
    pub regions: Vec<RegionDef>,
}

/// A set of numbered surfaces and the regions bounded by them.
///
/// Regions are expected not to overlap; anything outside every region is the
/// void ([`VOID_REGION`]).
#[derive(Debug, Clone, Default)]
pub struct Model {
    surfaces: Vec<Box<dyn Surface>>,
    regions: Vec<Region>,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from its file form. Surfaces are added before regions.
    pub fn from_file(file: &ModelFile) -> Result<Self> {
        let mut model = Self::new();
        for s in &file.surfaces {
            model.add_surface(s.id, &s.spec)?;
        }
        for r in &file.regions {
            model.add_region(r.id, &r.cell)?;
        }
        log::debug!(
            "model: {} surfaces, {} regions",
            model.surfaces.len(),
            model.regions.len()
        );
        Ok(model)
    }

    /// Parse a TOML model.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ModelFile = toml::from_str(text)?;
        Self::from_file(&file)
    }

    /// Read a TOML model file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The file form of this model.
    pub fn to_file(&self) -> ModelFile {
        ModelFile {
            surfaces: self
                .surfaces
                .iter()
                .map(|s| SurfaceDef {
                    id: s.name(),
                    spec: s.spec_string(),
                })
                .collect(),
            regions: self
                .regions
                .iter()
                .map(|r| RegionDef {
                    id: r.id(),
                    cell: r.cell_string(),
                })
                .collect(),
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(&self.to_file())?)
    }

    /// Add surface `id` from a specification line.
    pub fn add_surface(&mut self, id: i32, spec: &str) -> Result<()> {
        if id <= 0 {
            return Err(ModelError::InvalidSurfaceId(id));
        }
        if self.surface(id).is_some() {
            return Err(ModelError::DuplicateSurface(id));
        }
        let mut surface =
            surface_from_spec(spec).map_err(|source| ModelError::Surface { id, source })?;
        surface.set_name(id);
        self.surfaces.push(surface);
        Ok(())
    }

    /// Add region `id` from a cell description over existing surfaces.
    pub fn add_region(&mut self, id: i32, cell: &str) -> Result<()> {
        if id <= VOID_REGION {
            return Err(ModelError::InvalidRegionId(id));
        }
        if self.region(id).is_some() {
            return Err(ModelError::DuplicateRegion(id));
        }
        self.regions.push(Region::from_cell(id, cell, &self.surfaces)?);
        Ok(())
    }

    /// All surfaces in insertion order.
    pub fn surfaces(&self) -> &[Box<dyn Surface>] {
        &self.surfaces
    }

    /// All regions in insertion order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Surface number `id`.
    pub fn surface(&self, id: i32) -> Option<&dyn Surface> {
        self.surfaces
            .iter()
            .find(|s| s.name() == id)
            .map(|s| s.as_ref())
    }

    /// Region number `id`.
    pub fn region(&self, id: i32) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// The first region containing `pt`, or the void.
    pub fn region_of(&self, pt: &V3D) -> i32 {
        self.regions
            .iter()
            .find(|r| r.is_inside(pt))
            .map_or(VOID_REGION, |r| r.id())
    }

    /// Follow `line` forward through the model.
    ///
    /// The starting region is the one just ahead of the origin, so a line
    /// starting on a boundary is assigned to the region it moves into.
    ///
    /// Tracks are finite: the line must end in the void. A line that never
    /// leaves an unbounded cell, such as the half-space `-3`, fails with
    /// [`TrackError::Unterminated`](quadric_kernel_track::TrackError::Unterminated).
    /// Bound open cells with an outer surface to trace through them.
    pub fn trace(&self, line: &Line) -> Result<Track> {
        let init = self.region_of(&line.point_at(Tolerance::DEFAULT.crossing));
        let mut track = Track::from_line(*line, init);
        let crossings: usize = self.regions.iter().map(|r| r.intercept(&mut track)).sum();
        track.build_link()?;
        log::debug!(
            "trace from {}: start in {}, {} crossings, {} segments",
            line.origin(),
            init,
            crossings,
            track.len()
        );
        Ok(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadric_kernel_geom::SurfaceKind;
    use quadric_kernel_track::TrackError;

    const SHELL: &str = r#"
[[surface]]
id = 1
spec = "so 10"

[[surface]]
id = 2
spec = "so 5"

[[region]]
id = 1
cell = "-2"

[[region]]
id = 2
cell = "-1 2"
"#;

    #[test]
    fn test_from_toml() {
        let model = Model::from_toml_str(SHELL).unwrap();
        assert_eq!(model.surfaces().len(), 2);
        assert_eq!(model.regions().len(), 2);
        assert_eq!(model.surface(2).unwrap().surface_type(), SurfaceKind::Sphere);
        assert_eq!(model.surface(2).unwrap().write(), "2 so 5");
        assert!(model.surface(3).is_none());
    }

    #[test]
    fn test_region_of() {
        let model = Model::from_toml_str(SHELL).unwrap();
        assert_eq!(model.region_of(&V3D::zero()), 1);
        assert_eq!(model.region_of(&V3D::new(0.0, 7.0, 0.0)), 2);
        assert_eq!(model.region_of(&V3D::new(0.0, 0.0, 11.0)), VOID_REGION);
    }

    #[test]
    fn test_trace_from_centre() {
        let model = Model::from_toml_str(SHELL).unwrap();
        let line = Line::new(V3D::zero(), V3D::x_axis()).unwrap();
        let track = model.trace(&line).unwrap();
        let regions: Vec<i32> = track.iter().map(|u| u.region).collect();
        assert_eq!(regions, vec![1, 2]);
        assert_eq!(track.non_complete(), 0);
        assert!((track.total_length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_trace_open_cell_is_unterminated() {
        let mut model = Model::new();
        model.add_surface(3, "pz 0").unwrap();
        model.add_surface(4, "so 2").unwrap();
        model.add_region(1, "-3").unwrap();

        let line = Line::new(V3D::new(0.0, 0.0, 5.0), -V3D::z_axis()).unwrap();
        assert!(matches!(
            model.trace(&line),
            Err(ModelError::Track(TrackError::Unterminated { region: 1 }))
        ));

        // closing the cell with a sphere gives a finite track
        let mut closed = Model::new();
        closed.add_surface(3, "pz 0").unwrap();
        closed.add_surface(4, "so 2").unwrap();
        closed.add_region(1, "-3 -4").unwrap();
        let track = closed.trace(&line).unwrap();
        let regions: Vec<i32> = track.iter().map(|u| u.region).collect();
        assert_eq!(regions, vec![0, 1]);
        assert!((track.total_length() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_toml_round_trip() {
        let model = Model::from_toml_str(SHELL).unwrap();
        let text = model.to_toml_string().unwrap();
        let again = Model::from_toml_str(&text).unwrap();
        assert_eq!(again.to_file(), model.to_file());
    }

    #[test]
    fn test_model_errors() {
        let mut model = Model::new();
        model.add_surface(1, "so 1").unwrap();
        assert!(matches!(model.add_surface(1, "so 2"), Err(ModelError::DuplicateSurface(1))));
        assert!(matches!(model.add_surface(0, "so 2"), Err(ModelError::InvalidSurfaceId(0))));
        assert!(matches!(
            model.add_surface(2, "so"),
            Err(ModelError::Surface { id: 2, .. })
        ));
        assert!(matches!(model.add_region(0, "-1"), Err(ModelError::InvalidRegionId(0))));
        assert!(matches!(model.add_region(3, "-4"), Err(ModelError::Track(_))));
        model.add_region(3, "-1").unwrap();
        assert!(matches!(model.add_region(3, "1"), Err(ModelError::DuplicateRegion(3))));
        assert!(matches!(
            Model::from_toml_str("[[surface]]\nid = \"one\""),
            Err(ModelError::Parse(_))
        ));
    }
}
