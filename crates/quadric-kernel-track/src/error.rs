//! Error types for lines, tracks and regions.

use thiserror::Error;

/// Errors raised while building lines, regions or tracks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// A line or track was given a zero direction vector.
    #[error("direction vector is zero")]
    ZeroDirection,

    /// A region was left while the track was in a different region.
    #[error("leaving region {region} at distance {distance} while in region {current}")]
    UnmatchedLeave {
        /// Region the event leaves.
        region: i32,
        /// Region the track was in.
        current: i32,
        /// Distance of the event from the track origin.
        distance: f64,
    },

    /// A region was entered while the track was still inside another.
    #[error("entering region {region} at distance {distance} while still in region {current}")]
    OverlappingEnter {
        /// Region the event enters.
        region: i32,
        /// Region the track was in.
        current: i32,
        /// Distance of the event from the track origin.
        distance: f64,
    },

    /// The last event leaves the track inside a region.
    #[error("track ends inside region {region}")]
    Unterminated {
        /// Region the track never left.
        region: i32,
    },

    /// A cell refers to a surface number that does not exist.
    #[error("unknown surface {0}")]
    UnknownSurface(i32),

    /// A cell description could not be parsed.
    #[error("bad cell description '{0}'")]
    BadCell(String),
}

/// Result type for track operations.
pub type Result<T> = std::result::Result<T, TrackError>;
