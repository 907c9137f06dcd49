//! Session configuration.
//!
//! A [`SessionConfig`] describes the initial inputs of a session: the
//! dataset, the declared views with their depth sliders, and how
//! reconstruction is triggered. It can be loaded from JSON; missing fields
//! fall back to the demo defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use slicelink_core::{
    ConfigurationError, GroupSpec, Options, PlaneSpec, Result, SliceQuery, ThresholdDirection,
};
use slicelink_structures::{ReconstructionOptions, ViewRegistry, ViewSpec};

use crate::trigger::TriggerMode;

/// A declared view and the slice its depth slider starts at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(flatten)]
    pub spec: ViewSpec,
    pub slice: SliceQuery,
}

impl ViewConfig {
    /// Creates a view configuration.
    pub fn new(spec: ViewSpec, slice: SliceQuery) -> Self {
        Self { spec, slice }
    }
}

/// The two views whose selections bound a reconstructed surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionViews {
    pub first: String,
    pub second: String,
}

impl Default for ReconstructionViews {
    fn default() -> Self {
        Self {
            first: "view-1".to_string(),
            second: "view-2".to_string(),
        }
    }
}

/// Initial configuration of a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed of the point generator.
    pub seed: u64,

    /// Groups the cloud is generated from.
    pub groups: Vec<GroupSpec>,

    /// Plane shared by every 2D view.
    pub plane: PlaneSpec,

    /// Declared views.
    pub views: Vec<ViewConfig>,

    /// Views that bound reconstructed surfaces.
    pub reconstruction_views: ReconstructionViews,

    /// Ring ordering and closure.
    pub reconstruction: ReconstructionOptions,

    /// How the generate button arms reconstruction.
    pub trigger: TriggerMode,

    /// Display options.
    pub options: Options,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            groups: GroupSpec::demo(),
            plane: PlaneSpec::XY,
            views: vec![
                ViewConfig::new(
                    ViewSpec::new("view-1"),
                    SliceQuery::Threshold {
                        value: 0.0,
                        direction: ThresholdDirection::Below,
                    },
                ),
                ViewConfig::new(
                    ViewSpec::new("view-2").with_per_group_limit(250),
                    SliceQuery::Threshold {
                        value: 1.0,
                        direction: ThresholdDirection::Below,
                    },
                ),
            ],
            reconstruction_views: ReconstructionViews::default(),
            reconstruction: ReconstructionOptions::default(),
            trigger: TriggerMode::default(),
            options: Options::default(),
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the view registry declared by this configuration.
    pub fn view_registry(&self) -> std::result::Result<ViewRegistry, ConfigurationError> {
        let mut registry = ViewRegistry::new();
        for view in &self.views {
            registry.register(view.spec.clone())?;
        }
        Ok(registry)
    }

    /// Checks everything that can be checked without generating the cloud.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        self.options.validate()?;
        let registry = self.view_registry()?;
        for name in [
            &self.reconstruction_views.first,
            &self.reconstruction_views.second,
        ] {
            registry.require(name)?;
        }
        for view in &self.views {
            view.slice.validate()?;
        }
        Ok(())
    }
}
