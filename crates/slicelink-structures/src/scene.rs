//! 3D scene geometry handed to the presentation layer.
//!
//! A scene is additive: surfaces and frames are appended as new layers and
//! the point layers they were built from stay in place.

use glam::DVec3;
use serde::Serialize;
use slicelink_core::{PointCloud, Projection};

use crate::reconstruct::ReconstructedSurface;

/// One drawable layer of a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneLayer {
    /// The points of one group.
    Points { group: String, positions: Vec<DVec3> },
    /// A reconstructed surface.
    Surface {
        name: String,
        surface: ReconstructedSurface,
    },
    /// A closed outline lying in a depth plane.
    Frame { name: String, outline: [DVec3; 5] },
}

impl SceneLayer {
    /// Returns the layer name (the group label for point layers).
    pub fn name(&self) -> &str {
        match self {
            Self::Points { group, .. } => group,
            Self::Surface { name, .. } | Self::Frame { name, .. } => name,
        }
    }
}

/// Ordered collection of 3D layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    layers: Vec<SceneLayer>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scene with one point layer per group of `cloud`.
    pub fn from_cloud(cloud: &PointCloud) -> Self {
        let mut layers = Vec::new();
        for label in cloud.group_labels() {
            let positions = cloud
                .points()
                .iter()
                .filter(|p| p.group() == label)
                .map(slicelink_core::Point::position)
                .collect();
            layers.push(SceneLayer::Points {
                group: label.to_string(),
                positions,
            });
        }
        Self { layers }
    }

    /// Appends a layer.
    pub fn push(&mut self, layer: SceneLayer) {
        self.layers.push(layer);
    }

    /// Returns this scene with a surface layer appended.
    #[must_use]
    pub fn with_surface(mut self, name: impl Into<String>, surface: ReconstructedSurface) -> Self {
        self.push(SceneLayer::Surface {
            name: name.into(),
            surface,
        });
        self
    }

    /// Returns this scene with a frame layer appended.
    #[must_use]
    pub fn with_frame(mut self, name: impl Into<String>, outline: [DVec3; 5]) -> Self {
        self.push(SceneLayer::Frame {
            name: name.into(),
            outline,
        });
        self
    }

    /// Returns the layers in drawing order.
    pub fn layers(&self) -> &[SceneLayer] {
        &self.layers
    }

    /// Returns the reconstructed surfaces in the scene.
    pub fn surfaces(&self) -> impl Iterator<Item = &ReconstructedSurface> {
        self.layers.iter().filter_map(|layer| match layer {
            SceneLayer::Surface { surface, .. } => Some(surface),
            _ => None,
        })
    }

    /// Returns the total number of points across point layers.
    pub fn num_points(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| match layer {
                SceneLayer::Points { positions, .. } => positions.len(),
                _ => 0,
            })
            .sum()
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if the scene has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Returns the planar bounding rectangle of `projection` placed at `depth`.
///
/// The outline is closed: the last corner repeats the first. Returns `None`
/// for an empty projection.
pub fn depth_frame(projection: &Projection, depth: f64) -> Option<[DVec3; 5]> {
    let (min, max) = projection.planar_bounds()?;
    let plane = projection.plane();
    let corner = |x: f64, y: f64| plane.compose(glam::DVec2::new(x, y), depth);
    Some([
        corner(min.x, min.y),
        corner(max.x, min.y),
        corner(max.x, max.y),
        corner(min.x, max.y),
        corner(min.x, min.y),
    ])
}
