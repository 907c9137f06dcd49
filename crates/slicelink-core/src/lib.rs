//! Core types for slicelink.
//!
//! This crate provides the data model and the pure algorithms underneath every
//! linked view:
//! - [`PointCloud`] generation and storage with stable point ids
//! - [`PlaneSpec`] axis pairs and [`project`]ion onto them, keeping depth
//! - Depth slices by threshold or equality ([`slice`])
//! - The error taxonomy and shared [`Options`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors return Self-derived values which don't need must_use
#![allow(clippy::must_use_candidate)]
// Depth comparisons against exact values are intentional
#![allow(clippy::float_cmp)]

pub mod axis;
pub mod error;
pub mod options;
pub mod point_cloud;
pub mod projection;
pub mod slice;

pub use axis::{axis_label, complement_axis, Axis, PlaneSpec};
pub use error::{ConfigurationError, ReconstructionError, Result, SliceLinkError};
pub use options::Options;
pub use point_cloud::{generate, GenerationKey, GroupSpec, Point, PointCloud, PointId};
pub use projection::{project, ProjectedPoint, Projection};
pub use slice::{by_equality, by_threshold, depth_exact, SliceQuery, ThresholdDirection, Tolerance};

// Re-export glam types for convenience
pub use glam::{DVec2, DVec3, UVec3};
