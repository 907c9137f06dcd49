//! Cross-section extraction by depth.
//!
//! Both extractors walk the projection once and never fail; an empty set is
//! an ordinary result. Parameters are validated when a [`SliceQuery`] or a
//! [`Tolerance`] is built.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::point_cloud::PointId;
use crate::projection::Projection;

/// Which side of a threshold to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdDirection {
    /// Keep points with `depth < value`.
    #[default]
    Below,
    /// Keep points with `depth > value`.
    Above,
}

/// Absolute tolerance for depth equality.
///
/// Zero is allowed, but generated depths are almost never exactly equal to a
/// slider value, so a zero tolerance usually selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    /// Creates a tolerance; negative or non-finite values are rejected.
    pub fn new(value: f64) -> Result<Self, ConfigurationError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(ConfigurationError::InvalidTolerance(value))
        }
    }

    /// Returns the tolerance value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(0.05)
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = ConfigurationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

/// A depth-based subset query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SliceQuery {
    /// Points whose depth is within `tolerance` of `value`.
    Equality { value: f64, tolerance: Tolerance },
    /// Points strictly below or above `value`.
    Threshold {
        value: f64,
        direction: ThresholdDirection,
    },
}

impl SliceQuery {
    /// Creates a threshold query.
    pub fn threshold(value: f64, direction: ThresholdDirection) -> Result<Self, ConfigurationError> {
        check_depth(value)?;
        Ok(Self::Threshold { value, direction })
    }

    /// Creates an equality query.
    pub fn equality(value: f64, tolerance: f64) -> Result<Self, ConfigurationError> {
        check_depth(value)?;
        Ok(Self::Equality {
            value,
            tolerance: Tolerance::new(tolerance)?,
        })
    }

    /// Checks a query that was built without the constructors.
    ///
    /// Tolerances are checked when they are built, so only the depth can be
    /// out of range here.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_depth(self.depth())
    }

    /// Returns the depth value this query is anchored at.
    pub fn depth(&self) -> f64 {
        match *self {
            Self::Equality { value, .. } | Self::Threshold { value, .. } => value,
        }
    }

    /// Returns a copy of this query moved to another depth.
    pub fn with_depth(self, depth: f64) -> Result<Self, ConfigurationError> {
        check_depth(depth)?;
        Ok(match self {
            Self::Equality { tolerance, .. } => Self::Equality {
                value: depth,
                tolerance,
            },
            Self::Threshold { direction, .. } => Self::Threshold {
                value: depth,
                direction,
            },
        })
    }

    /// Runs the query against a projection.
    pub fn apply(&self, projection: &Projection) -> BTreeSet<PointId> {
        match *self {
            Self::Equality { value, tolerance } => by_equality(projection, value, tolerance),
            Self::Threshold { value, direction } => by_threshold(projection, value, direction),
        }
    }
}

fn check_depth(value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NonFiniteDepth(value))
    }
}

/// Returns ids whose depth is strictly below or above `value`.
pub fn by_threshold(
    projection: &Projection,
    value: f64,
    direction: ThresholdDirection,
) -> BTreeSet<PointId> {
    projection
        .points()
        .iter()
        .filter(|p| match direction {
            ThresholdDirection::Below => p.depth < value,
            ThresholdDirection::Above => p.depth > value,
        })
        .map(|p| p.id)
        .collect()
}

/// Returns ids whose depth lies within `tolerance` of `value`.
pub fn by_equality(projection: &Projection, value: f64, tolerance: Tolerance) -> BTreeSet<PointId> {
    projection
        .points()
        .iter()
        .filter(|p| (p.depth - value).abs() <= tolerance.value())
        .map(|p| p.id)
        .collect()
}

/// Returns ids whose depth equals `value` exactly.
///
/// Together with both threshold directions this partitions the cloud.
pub fn depth_exact(projection: &Projection, value: f64) -> BTreeSet<PointId> {
    projection
        .points()
        .iter()
        .filter(|p| p.depth == value)
        .map(|p| p.id)
        .collect()
}
