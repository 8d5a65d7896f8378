//! Error types returned by the engine's fallible operations.
//!
//! Expected conditions (a tap that misses the image, an operation before any
//! image is loaded) are reported through these values rather than panics. The
//! gesture path never surfaces errors at all: degenerate updates are dropped
//! and logged.

use crate::markers::MarkerId;

/// Why a tap did not produce an image coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The floored 0-based pixel lies outside `[0, width) x [0, height)`.
    #[error("tap at image pixel ({x}, {y}) is outside the image")]
    OutOfBounds { x: i64, y: i64 },
    /// The tap position is NaN or infinite.
    #[error("tap position is not a finite point")]
    NonFinite,
    /// No image has been loaded yet.
    #[error("no image loaded")]
    NoImageLoaded,
}

/// Error returned when constructing an [`crate::surface::ImageSurface`].
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// One or both native dimensions are zero.
    #[error("image has empty dimensions {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    /// The supplied bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Error returned when loading or validating an [`crate::config::EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for the config shape.
    #[error("invalid config document: {0}")]
    Json(#[from] serde_json::Error),
    /// A field holds a value outside its domain.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Error returned by [`crate::markers::MarkerStore`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store already holds its maximum number of markers.
    #[error("marker limit reached ({max})")]
    Full { max: usize },
    /// An anchor marker already exists.
    #[error("an anchor marker already exists")]
    AnchorExists,
    /// The anchor marker cannot be removed or renamed.
    #[error("the anchor marker is locked")]
    AnchorLocked,
    /// No marker has the given id.
    #[error("marker {0} not found")]
    NotFound(MarkerId),
    /// A reorder index is past the end of the list.
    #[error("index {index} out of range for {len} markers")]
    IndexOutOfRange { index: usize, len: usize },
}
