#![warn(missing_docs)]

//! Quadric surface CSG kernel facade.
//!
//! Provides the [`Model`] type (numbered quadric surfaces, regions bounded
//! by them, and tracing of straight lines through the regions) plus
//! re-exports of the kernel crates.
//!
//! # Example
//!
//! ```
//! use quadric_kernel::{Line, Model, V3D};
//!
//! let model = Model::from_toml_str(r#"
//!     [[surface]]
//!     id = 1
//!     spec = "cz 1"
//!
//!     [[surface]]
//!     id = 2
//!     spec = "px 3"
//!
//!     [[region]]
//!     id = 4
//!     cell = "-1 -2"
//! "#).unwrap();
//!
//! let line = Line::new(V3D::new(-5.0, 0.0, 0.0), V3D::x_axis()).unwrap();
//! let track = model.trace(&line).unwrap();
//! let regions: Vec<i32> = track.iter().map(|u| u.region).collect();
//! assert_eq!(regions, vec![0, 4]);
//! ```

pub use quadric_kernel_geom;
pub use quadric_kernel_math;
pub use quadric_kernel_track;

pub use quadric_kernel_geom::{
    surface_from_spec, Cone, Cylinder, General, GeomError, Plane, QuadricEquation, Side, Sphere,
    Surface, SurfaceKind,
};
pub use quadric_kernel_math::{Mat3, Tolerance, V3D};
pub use quadric_kernel_track::{
    Crossing, Line, Region, TPartial, TUnit, Track, TrackError, VOID_REGION,
};

mod error;
mod model;

pub use error::{ModelError, Result};
pub use model::{Model, ModelFile, RegionDef, SurfaceDef};
