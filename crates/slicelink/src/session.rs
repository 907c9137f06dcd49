//! Orchestration of derived state.
//!
//! Every input change re-derives the whole dependency chain from scratch:
//!
//! ```text
//! (seed, groups) -> cloud -> (plane) projection -> (depths) slices
//!                          \-> selections -> highlight
//!                          \-> selections + trigger -> surface -> scene
//! ```
//!
//! [`derive`] is a pure function of its inputs, so deriving twice from the
//! same inputs yields equal [`DerivedState`]s. [`Session`] holds the inputs,
//! applies events, and keeps the last generated cloud so unrelated changes
//! (plane, sliders) do not regenerate it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use slicelink_core::{
    generate, project, ConfigurationError, GroupSpec, PlaneSpec, PointCloud, PointId, Projection,
    ReconstructionError, Result, SliceQuery,
};
use slicelink_structures::{
    depth_frame, highlight_state, reconstruct_surface, HighlightState,
    PartialReconstructionWarning, ReconstructedSurface, Scene, SelectionManager, SelectionRecord,
};

use crate::config::SessionConfig;
use crate::trigger::Trigger;

/// Name of the surface layer appended to the scene.
pub const SURFACE_LAYER: &str = "polygon";

/// User-controlled parameters that the cloud, projection, and slices depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInputs {
    pub seed: u64,
    pub groups: Vec<GroupSpec>,
    pub plane: PlaneSpec,
    /// Current depth slider of each view.
    pub slices: BTreeMap<String, SliceQuery>,
}

impl SessionInputs {
    /// Takes the initial inputs from a configuration.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            seed: config.seed,
            groups: config.groups.clone(),
            plane: config.plane,
            slices: config
                .views
                .iter()
                .map(|view| (view.spec.name.clone(), view.slice))
                .collect(),
        }
    }

    /// Returns the slice query of `view`.
    pub fn slice(&self, view: &str) -> std::result::Result<&SliceQuery, ConfigurationError> {
        self.slices
            .get(view)
            .ok_or_else(|| ConfigurationError::UnknownView(view.to_string()))
    }
}

/// Outcome of the reconstruction step.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceState {
    /// The trigger is disarmed; nothing was attempted.
    NotArmed,
    /// A surface was built, possibly connecting only part of the rings.
    Built {
        surface: ReconstructedSurface,
        warning: Option<PartialReconstructionWarning>,
    },
    /// Reconstruction failed; `surface` is the explicit empty surface.
    Failed {
        surface: ReconstructedSurface,
        error: ReconstructionError,
    },
}

impl SurfaceState {
    /// Returns the surface to display, if reconstruction was attempted.
    pub fn surface(&self) -> Option<&ReconstructedSurface> {
        match self {
            Self::NotArmed => None,
            Self::Built { surface, .. } | Self::Failed { surface, .. } => Some(surface),
        }
    }

    /// Returns the message to show the user, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NotArmed | Self::Built { warning: None, .. } => None,
            Self::Built {
                warning: Some(warning),
                ..
            } => Some(warning.to_string()),
            Self::Failed { error, .. } => Some(error.to_string()),
        }
    }
}

/// Everything derived from the session inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedState {
    pub cloud: Arc<PointCloud>,
    pub projection: Arc<Projection>,
    /// Ids drawn in each view.
    pub visible: BTreeMap<String, Vec<PointId>>,
    /// Result of each view's depth slice.
    pub slices: BTreeMap<String, BTreeSet<PointId>>,
    pub highlight: HighlightState,
    pub surface: SurfaceState,
    pub scene: Scene,
}

/// Derives all state from an already generated cloud.
pub fn derive_from_cloud(
    cloud: Arc<PointCloud>,
    inputs: &SessionInputs,
    selections: &SelectionManager,
    armed: bool,
    config: &SessionConfig,
) -> Result<DerivedState> {
    let projection = Arc::new(project(&cloud, inputs.plane));

    let mut visible = BTreeMap::new();
    let mut slices = BTreeMap::new();
    for view in selections.views().iter() {
        let query = inputs.slice(&view.name)?;
        visible.insert(view.name.clone(), view.visible_ids(&cloud));
        slices.insert(view.name.clone(), query.apply(&projection));
    }

    let highlight = highlight_state(&cloud, selections);

    let surface = if armed {
        reconstruct(&cloud, selections, config)
    } else {
        SurfaceState::NotArmed
    };

    let mut scene = Scene::from_cloud(&cloud);
    for (view, query) in &inputs.slices {
        if let Some(outline) = depth_frame(&projection, query.depth()) {
            scene = scene.with_frame(format!("frame:{view}"), outline);
        }
    }
    if let SurfaceState::Built { surface, .. } = &surface {
        scene = scene.with_surface(SURFACE_LAYER, surface.clone());
    }

    Ok(DerivedState {
        cloud,
        projection,
        visible,
        slices,
        highlight,
        surface,
        scene,
    })
}

/// Derives all state, generating the cloud from the inputs.
pub fn derive(
    inputs: &SessionInputs,
    selections: &SelectionManager,
    armed: bool,
    config: &SessionConfig,
) -> Result<DerivedState> {
    let cloud = Arc::new(generate(inputs.seed, &inputs.groups)?);
    derive_from_cloud(cloud, inputs, selections, armed, config)
}

fn reconstruct(
    cloud: &PointCloud,
    selections: &SelectionManager,
    config: &SessionConfig,
) -> SurfaceState {
    let views = &config.reconstruction_views;
    let (first, second) = (
        selections.selection(&views.first),
        selections.selection(&views.second),
    );

    let result = match (first, second) {
        (Some(first), Some(second)) => {
            reconstruct_surface(first, second, cloud, &config.reconstruction)
        }
        _ => {
            // A view that never had a selection counts as an empty ring.
            let empty_views = [(&views.first, first), (&views.second, second)]
                .into_iter()
                .filter(|(_, s)| s.map_or(true, |s| s.is_empty()))
                .map(|(name, _)| name.clone())
                .collect();
            Err(ReconstructionError::NoDataSelected { empty_views })
        }
    };

    match result {
        Ok(reconstruction) => SurfaceState::Built {
            surface: reconstruction.surface,
            warning: reconstruction.warning,
        },
        Err(error) => {
            log::warn!("reconstruction failed: {error}");
            SurfaceState::Failed {
                surface: ReconstructedSurface::empty(),
                error,
            }
        }
    }
}

/// An interactive exploration session.
///
/// Events update the inputs and synchronously re-derive the state. A failing
/// event leaves the inputs and the derived state exactly as they were.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    inputs: SessionInputs,
    selections: SelectionManager,
    trigger: Trigger,
    derived: DerivedState,
}

impl Session {
    /// Starts a session from a configuration.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let inputs = SessionInputs::from_config(&config);
        let selections = SelectionManager::new(config.view_registry()?);
        let trigger = Trigger::new(config.trigger);
        let derived = derive(&inputs, &selections, trigger.is_armed(), &config)?;
        Ok(Self {
            config,
            inputs,
            selections,
            trigger,
            derived,
        })
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current inputs.
    pub fn inputs(&self) -> &SessionInputs {
        &self.inputs
    }

    /// Returns the current derived state.
    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    /// Returns the selection manager.
    pub fn selections(&self) -> &SelectionManager {
        &self.selections
    }

    /// Returns the reconstruction trigger.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Changes the generator seed.
    pub fn set_seed(&mut self, seed: u64) -> Result<&DerivedState> {
        let mut inputs = self.inputs.clone();
        inputs.seed = seed;
        let mut trigger = self.trigger;
        trigger.inputs_changed();
        self.commit(inputs, self.selections.clone(), trigger)
    }

    /// Replaces the group specs.
    pub fn set_groups(&mut self, groups: Vec<GroupSpec>) -> Result<&DerivedState> {
        let mut inputs = self.inputs.clone();
        inputs.groups = groups;
        let mut trigger = self.trigger;
        trigger.inputs_changed();
        self.commit(inputs, self.selections.clone(), trigger)
    }

    /// Changes the plane of the 2D views.
    pub fn set_plane(&mut self, plane: PlaneSpec) -> Result<&DerivedState> {
        let mut inputs = self.inputs.clone();
        inputs.plane = plane;
        self.commit(inputs, self.selections.clone(), self.trigger)
    }

    /// Replaces the slice query of `view`.
    pub fn set_slice(&mut self, view: &str, query: SliceQuery) -> Result<&DerivedState> {
        let mut inputs = self.inputs.clone();
        let slot = inputs
            .slices
            .get_mut(view)
            .ok_or_else(|| ConfigurationError::UnknownView(view.to_string()))?;
        *slot = query;
        self.commit(inputs, self.selections.clone(), self.trigger)
    }

    /// Moves the depth slider of `view`, keeping the slice kind.
    pub fn set_slice_depth(&mut self, view: &str, depth: f64) -> Result<&DerivedState> {
        let query = self.inputs.slice(view)?.with_depth(depth)?;
        self.set_slice(view, query)
    }

    /// Switches `view` to an equality slice at `depth`.
    ///
    /// The band width is the configured default tolerance.
    pub fn set_equality_slice(&mut self, view: &str, depth: f64) -> Result<&DerivedState> {
        let query = self.config.options.equality_slice(depth)?;
        self.set_slice(view, query)
    }

    /// Records a selection event from `view`.
    ///
    /// The view's current slider depth and the current plane are captured
    /// with the selection.
    pub fn select<I>(&mut self, view: &str, ids: I) -> Result<&DerivedState>
    where
        I: IntoIterator<Item = PointId>,
    {
        let depth = self.inputs.slice(view)?.depth();
        let mut selections = self.selections.clone();
        selections.set_selection(view, ids, depth, self.inputs.plane, &self.derived.cloud)?;
        let mut trigger = self.trigger;
        trigger.inputs_changed();
        self.commit(self.inputs.clone(), selections, trigger)
    }

    /// Records an explicit empty selection for `view`.
    pub fn clear_selection(&mut self, view: &str) -> Result<&DerivedState> {
        self.select(view, std::iter::empty())
    }

    /// Presses the generate button.
    pub fn press_generate(&mut self) -> Result<&DerivedState> {
        let mut trigger = self.trigger;
        trigger.press();
        log::debug!(
            "generate pressed ({} presses, armed: {})",
            trigger.presses(),
            trigger.is_armed()
        );
        self.commit(self.inputs.clone(), self.selections.clone(), trigger)
    }

    /// Flattens the current selections for tabular display.
    pub fn selection_records(&self) -> Vec<SelectionRecord> {
        self.selections.selection_records(&self.derived.cloud)
    }

    fn commit(
        &mut self,
        inputs: SessionInputs,
        selections: SelectionManager,
        trigger: Trigger,
    ) -> Result<&DerivedState> {
        let cloud = if inputs.seed == self.inputs.seed && inputs.groups == self.inputs.groups {
            log::debug!("reusing point cloud for seed {}", inputs.seed);
            Arc::clone(&self.derived.cloud)
        } else {
            Arc::new(generate(inputs.seed, &inputs.groups)?)
        };
        let derived =
            derive_from_cloud(cloud, &inputs, &selections, trigger.is_armed(), &self.config)?;

        self.inputs = inputs;
        self.selections = selections;
        self.trigger = trigger;
        self.derived = derived;
        Ok(&self.derived)
    }
}
