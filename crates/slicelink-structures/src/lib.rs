//! Structure implementations for slicelink.
//!
//! This crate builds on the core data model with the interactive pieces:
//! - View declarations and the per-view [`SelectionManager`]
//! - Linked highlighting across views ([`highlight_state`])
//! - Cross-section surfaces between two selections ([`reconstruct_surface`])
//! - Additive 3D [`Scene`] geometry and depth frames

// Index buffers use u32 vertex indices
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]

pub mod highlight;
pub mod reconstruct;
pub mod registry;
pub mod scene;
pub mod selection;

pub use highlight::{highlight_state, HighlightInfo, HighlightState};
pub use reconstruct::{
    extrude_profile, reconstruct_surface, PartialReconstructionWarning, Reconstruction,
    ReconstructedSurface, ReconstructionOptions, RingClosure, RingOrder, RingSide, VertexSource,
};
pub use registry::{ViewRegistry, ViewSpec};
pub use scene::{depth_frame, Scene, SceneLayer};
pub use selection::{Selection, SelectionManager, SelectionRecord};
