#![warn(missing_docs)]

//! Directed lines and region tracks for the quadric kernel.
//!
//! This crate follows a straight line through a model built from quadric
//! surfaces and reports which region the line occupies over each stretch.
//!
//! # Architecture
//!
//! - [`Line`] - Directed line with origin and unit direction
//! - [`intersect`] - Line-surface intersection for each surface type
//! - [`Region`] - Cell bounded by an intersection of half-spaces
//! - [`Track`] - Crossing events assembled into ordered [`TUnit`] segments
//!
//! # Example
//!
//! ```
//! use quadric_kernel_geom::surface_from_spec;
//! use quadric_kernel_math::V3D;
//! use quadric_kernel_track::{Region, Track};
//!
//! let surfaces = vec![surface_from_spec("1 so 2").unwrap()];
//! let ball = Region::from_cell(7, "-1", &surfaces).unwrap();
//!
//! let mut track = Track::new(V3D::new(-5.0, 0.0, 0.0), V3D::x_axis(), 0).unwrap();
//! ball.intercept(&mut track);
//! track.build_link().unwrap();
//!
//! assert_eq!(track.region_at(4.0), Some(7));
//! assert_eq!(track.non_complete(), 0);
//! ```

pub mod error;
pub mod intersect;
mod line;
mod region;
mod track;

pub use error::{Result, TrackError};
pub use line::Line;
pub use region::{HalfSpace, Region};
pub use track::{Crossing, TPartial, TUnit, Track, VOID_REGION};
