//! slicelink: linked depth slices over a generated point cloud.
//!
//! A session generates a labeled 3D point cloud, projects it onto a plane,
//! and lets several 2D views slice it by depth. Selections made in any view
//! are highlighted in every other view, and two selections taken at
//! different depths can be joined into a reconstructed cross-section surface.
//!
//! # Quick Start
//!
//! ```no_run
//! use slicelink::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut session = Session::new(SessionConfig::default())?;
//!     session.select("view-1", [0, 1, 2, 3])?;
//!     session.select("view-2", [4, 5, 6, 7])?;
//!
//!     let derived = session.press_generate()?;
//!     if let Some(surface) = derived.surface.surface() {
//!         println!("{} faces", surface.face_count());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`slicelink_core`]: cloud generation, projection, and depth slicing
//! - [`slicelink_structures`]: views, selections, highlighting, reconstruction
//! - this crate: configuration and the [`Session`] that re-derives
//!   everything after each event

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod session;
pub mod trigger;

// Re-export core types
pub use slicelink_core::{
    axis_label, by_equality, by_threshold, complement_axis, depth_exact, generate, project, Axis,
    ConfigurationError, GenerationKey, GroupSpec, Options, PlaneSpec, Point, PointCloud, PointId,
    ProjectedPoint, Projection, ReconstructionError, Result, SliceLinkError, SliceQuery,
    ThresholdDirection, Tolerance, DVec2, DVec3, UVec3,
};

// Re-export structures
pub use slicelink_structures::{
    depth_frame, extrude_profile, highlight_state, reconstruct_surface, HighlightInfo,
    HighlightState, PartialReconstructionWarning, Reconstruction, ReconstructedSurface,
    ReconstructionOptions, RingClosure, RingOrder, RingSide, Scene, SceneLayer, Selection,
    SelectionManager, SelectionRecord, VertexSource, ViewRegistry, ViewSpec,
};

pub use config::{ReconstructionViews, SessionConfig, ViewConfig};
pub use session::{
    derive, derive_from_cloud, DerivedState, Session, SessionInputs, SurfaceState, SURFACE_LAYER,
};
pub use trigger::{Trigger, TriggerMode};

/// Installs the `env_logger` backend for the `log` facade.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::info!("slicelink {} logging initialized", env!("CARGO_PKG_VERSION"));
    }
}
