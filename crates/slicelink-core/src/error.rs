//! Error types for slicelink.

use thiserror::Error;

/// Invalid generation or view parameters.
///
/// Fatal to the current recomputation: no partial output is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Cloud generation was requested without any groups.
    #[error("at least one point group is required")]
    EmptyGroupList,

    /// A group asked for zero samples.
    #[error("group '{group}' has an invalid sample count: {count}")]
    InvalidSampleCount { group: String, count: usize },

    /// A group spread was zero, negative, or not finite.
    #[error("group '{group}' has an invalid spread: {spread} (must be finite and > 0)")]
    InvalidSpread { group: String, spread: f64 },

    /// A group center had a NaN or infinite component.
    #[error("group '{0}' has a non-finite center")]
    NonFiniteCenter(String),

    /// A group label was empty.
    #[error("group labels must not be empty")]
    EmptyGroupLabel,

    /// Two groups share a label.
    #[error("group '{0}' is declared more than once")]
    DuplicateGroup(String),

    /// A point supplied from outside had a NaN or infinite coordinate.
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),

    /// An axis index outside `0..=2`.
    #[error("axis index {0} is out of range (expected 0, 1, or 2)")]
    InvalidAxisIndex(usize),

    /// A plane was built from the same axis twice.
    #[error("plane axes must be distinct, got {0} twice")]
    DuplicateAxis(&'static str),

    /// A plane name that is not one of `XY`, `XZ`, `YZ` (or reversed).
    #[error("unknown plane '{0}'")]
    UnknownPlane(String),

    /// A depth or slice value was NaN or infinite.
    #[error("depth value {0} is not finite")]
    NonFiniteDepth(f64),

    /// An equality tolerance was negative or not finite.
    #[error("invalid tolerance {0} (must be finite and >= 0)")]
    InvalidTolerance(f64),

    /// A view name that was never declared.
    #[error("view '{0}' was never declared")]
    UnknownView(String),

    /// A view declared twice.
    #[error("view '{0}' already exists")]
    ViewExists(String),

    /// The opacity used for de-emphasized points is outside `0.0..=1.0`.
    #[error("invalid opacity {0} (must be within 0.0..=1.0)")]
    InvalidOpacity(f32),
}

/// Empty or missing boundary data for a reconstruction.
///
/// Recoverable: callers display the message and show an empty surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructionError {
    /// One or both rings resolved to no points.
    #[error("no data selected")]
    NoDataSelected {
        /// Views whose selection resolved to an empty ring.
        empty_views: Vec<String>,
    },

    /// The two selections were made against different clouds.
    #[error("selections '{first}' and '{second}' come from different point clouds")]
    GenerationMismatch { first: String, second: String },

    /// A selection was made against a cloud that has since been replaced.
    #[error("selection '{0}' was made against a previous point cloud")]
    StaleSelection(String),
}

/// The main error type for slicelink operations.
#[derive(Error, Debug)]
pub enum SliceLinkError {
    /// Invalid parameters.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Reconstruction could not produce geometry.
    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for slicelink operations.
pub type Result<T> = std::result::Result<T, SliceLinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReconstructionError::NoDataSelected {
            empty_views: vec!["view-2".to_string()],
        };
        assert_eq!(format!("{err}"), "no data selected");

        let err = ConfigurationError::InvalidSampleCount {
            group: "outer".to_string(),
            count: 0,
        };
        assert!(format!("{err}").contains("outer"));
    }

    #[test]
    fn test_umbrella_is_transparent() {
        let err: SliceLinkError = ConfigurationError::UnknownView("view-9".to_string()).into();
        assert_eq!(format!("{err}"), "view 'view-9' was never declared");
        assert!(matches!(err, SliceLinkError::Configuration(_)));
    }
}
