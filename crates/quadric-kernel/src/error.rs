//! Error types for model loading and tracing.

use quadric_kernel_geom::GeomError;
use quadric_kernel_track::TrackError;
use thiserror::Error;

/// Errors that can occur while building or tracing a model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// I/O error reading or writing a model file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML model file.
    #[error("Invalid model file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Model could not be rendered as TOML.
    #[error("Cannot write model: {0}")]
    Write(#[from] toml::ser::Error),

    /// A surface specification was rejected.
    #[error("Surface {id}: {source}")]
    Surface {
        /// Surface number from the model.
        id: i32,
        /// Underlying parse error.
        #[source]
        source: GeomError,
    },

    /// Region construction or track assembly failed.
    #[error(transparent)]
    Track(#[from] TrackError),

    /// Two surfaces share a number.
    #[error("Duplicate surface {0}")]
    DuplicateSurface(i32),

    /// Two regions share a number.
    #[error("Duplicate region {0}")]
    DuplicateRegion(i32),

    /// Surface numbers must be positive so cells can sign them.
    #[error("Invalid surface id {0} (must be positive)")]
    InvalidSurfaceId(i32),

    /// Region numbers must be positive; 0 is the void.
    #[error("Invalid region id {0} (must be positive)")]
    InvalidRegionId(i32),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
