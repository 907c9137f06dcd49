//! Coordinate axes and the planes a 2D view is drawn in.
//!
//! A [`PlaneSpec`] names the two axes that become a view's horizontal and
//! vertical axes. The remaining axis is the view's depth axis.

use std::fmt;
use std::str::FromStr;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the axis for an index in `0..=2`.
    pub fn from_index(index: usize) -> Result<Self, ConfigurationError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ConfigurationError::InvalidAxisIndex(index))
    }

    /// Returns the index of this axis (0, 1 or 2).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Returns the presentation label ("X", "Y" or "Z").
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    /// Reads this axis' component of a point.
    pub fn component(self, point: DVec3) -> f64 {
        point[self.index()]
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the label for an axis index.
pub fn axis_label(index: usize) -> Result<&'static str, ConfigurationError> {
    Axis::from_index(index).map(Axis::label)
}

/// Returns the axis not present in `pair`.
///
/// When both entries are the same axis there are two candidates; the lowest
/// index one is returned. [`PlaneSpec`] never holds such a pair.
pub fn complement_axis(pair: (Axis, Axis)) -> Axis {
    Axis::ALL
        .into_iter()
        .find(|axis| *axis != pair.0 && *axis != pair.1)
        .unwrap_or(Axis::X)
}

/// An ordered pair of distinct axes defining a 2D view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaneSpec {
    horizontal: Axis,
    vertical: Axis,
}

impl PlaneSpec {
    /// The XY plane (depth along Z).
    pub const XY: PlaneSpec = PlaneSpec {
        horizontal: Axis::X,
        vertical: Axis::Y,
    };
    /// The XZ plane (depth along Y).
    pub const XZ: PlaneSpec = PlaneSpec {
        horizontal: Axis::X,
        vertical: Axis::Z,
    };
    /// The YZ plane (depth along X).
    pub const YZ: PlaneSpec = PlaneSpec {
        horizontal: Axis::Y,
        vertical: Axis::Z,
    };

    /// Creates a plane from two distinct axes.
    pub fn new(horizontal: Axis, vertical: Axis) -> Result<Self, ConfigurationError> {
        if horizontal == vertical {
            return Err(ConfigurationError::DuplicateAxis(horizontal.label()));
        }
        Ok(Self {
            horizontal,
            vertical,
        })
    }

    /// Creates a plane from two axis indices.
    pub fn from_indices(horizontal: usize, vertical: usize) -> Result<Self, ConfigurationError> {
        Self::new(Axis::from_index(horizontal)?, Axis::from_index(vertical)?)
    }

    /// Creates the plane that slices along `depth`, keeping the other two
    /// axes in index order.
    pub fn from_depth_axis(depth: Axis) -> Self {
        match depth {
            Axis::X => Self::YZ,
            Axis::Y => Self::XZ,
            Axis::Z => Self::XY,
        }
    }

    /// Returns the horizontal axis.
    pub fn horizontal(self) -> Axis {
        self.horizontal
    }

    /// Returns the vertical axis.
    pub fn vertical(self) -> Axis {
        self.vertical
    }

    /// Returns the axis pair in view order.
    pub fn pair(self) -> (Axis, Axis) {
        (self.horizontal, self.vertical)
    }

    /// Returns the depth axis.
    pub fn depth_axis(self) -> Axis {
        complement_axis(self.pair())
    }

    /// Splits a point into its planar coordinates and depth.
    pub fn split(self, point: DVec3) -> (DVec2, f64) {
        (
            DVec2::new(
                self.horizontal.component(point),
                self.vertical.component(point),
            ),
            self.depth_axis().component(point),
        )
    }

    /// Rebuilds a 3D point from planar coordinates and a depth.
    pub fn compose(self, planar: DVec2, depth: f64) -> DVec3 {
        let mut point = DVec3::ZERO;
        point[self.horizontal.index()] = planar.x;
        point[self.vertical.index()] = planar.y;
        point[self.depth_axis().index()] = depth;
        point
    }

    /// Returns the plane name, e.g. `"XZ"`.
    pub fn name(self) -> String {
        format!("{}{}", self.horizontal, self.vertical)
    }
}

impl Default for PlaneSpec {
    fn default() -> Self {
        Self::XY
    }
}

impl fmt::Display for PlaneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.horizontal, self.vertical)
    }
}

impl FromStr for PlaneSpec {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigurationError::UnknownPlane(s.to_string());
        let mut axes = s.trim().chars().map(|c| match c.to_ascii_uppercase() {
            'X' => Ok(Axis::X),
            'Y' => Ok(Axis::Y),
            'Z' => Ok(Axis::Z),
            _ => Err(unknown()),
        });
        let horizontal = axes.next().ok_or_else(unknown)??;
        let vertical = axes.next().ok_or_else(unknown)??;
        if axes.next().is_some() {
            return Err(unknown());
        }
        Self::new(horizontal, vertical)
    }
}

impl TryFrom<String> for PlaneSpec {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlaneSpec> for String {
    fn from(plane: PlaneSpec) -> Self {
        plane.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement_of_each_pair() {
        assert_eq!(complement_axis((Axis::X, Axis::Y)), Axis::Z);
        assert_eq!(complement_axis((Axis::X, Axis::Z)), Axis::Y);
        assert_eq!(complement_axis((Axis::Y, Axis::Z)), Axis::X);
        // Order within the pair does not matter
        assert_eq!(complement_axis((Axis::Z, Axis::X)), Axis::Y);
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(axis_label(0), Ok("X"));
        assert_eq!(axis_label(1), Ok("Y"));
        assert_eq!(axis_label(2), Ok("Z"));
        assert_eq!(axis_label(3), Err(ConfigurationError::InvalidAxisIndex(3)));
    }

    #[test]
    fn test_plane_rejects_duplicate_axes() {
        assert!(PlaneSpec::new(Axis::Y, Axis::Y).is_err());
        assert!(PlaneSpec::from_indices(2, 2).is_err());
        assert!(PlaneSpec::from_indices(0, 7).is_err());
    }

    #[test]
    fn test_plane_parse() {
        assert_eq!("XY".parse::<PlaneSpec>(), Ok(PlaneSpec::XY));
        assert_eq!("xz".parse::<PlaneSpec>(), Ok(PlaneSpec::XZ));
        let reversed: PlaneSpec = "ZY".parse().unwrap();
        assert_eq!(reversed.pair(), (Axis::Z, Axis::Y));
        assert_eq!(reversed.depth_axis(), Axis::X);
        assert!("XX".parse::<PlaneSpec>().is_err());
        assert!("XYZ".parse::<PlaneSpec>().is_err());
        assert!("Q".parse::<PlaneSpec>().is_err());
    }

    #[test]
    fn test_from_depth_axis() {
        for axis in Axis::ALL {
            assert_eq!(PlaneSpec::from_depth_axis(axis).depth_axis(), axis);
        }
    }

    #[test]
    fn test_split_and_compose() {
        let point = DVec3::new(1.0, 2.0, 3.0);
        let plane = PlaneSpec::new(Axis::Z, Axis::X).unwrap();
        let (planar, depth) = plane.split(point);
        assert_eq!(planar, DVec2::new(3.0, 1.0));
        assert_eq!(depth, 2.0);
        assert_eq!(plane.compose(planar, depth), point);
    }

    #[test]
    fn test_plane_serde() {
        let json = serde_json::to_string(&PlaneSpec::YZ).unwrap();
        assert_eq!(json, "\"YZ\"");
        let back: PlaneSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PlaneSpec::YZ);
        assert!(serde_json::from_str::<PlaneSpec>("\"YY\"").is_err());
    }
}
