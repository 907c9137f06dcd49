//! Linked highlighting across views.
//!
//! Every view draws the whole cloud; points that appear in any selection are
//! emphasized and the rest are faded, so spatial context is preserved.

use serde::Serialize;
use slicelink_core::{Options, PointCloud, PointId};

use crate::selection::SelectionManager;

/// Highlight state of one point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightInfo {
    /// Whether the point is in any active selection.
    pub selected: bool,
    /// The first view (by name) whose selection contains the point.
    pub view: Option<String>,
}

impl HighlightInfo {
    /// Returns the opacity to draw this point with.
    pub fn opacity(&self, options: &Options) -> f32 {
        if self.selected {
            1.0
        } else {
            options.unselected_opacity
        }
    }
}

/// Highlight state of every point in a cloud, indexed by point id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightState {
    points: Vec<HighlightInfo>,
}

impl HighlightState {
    /// Returns the state of one point.
    pub fn get(&self, id: PointId) -> Option<&HighlightInfo> {
        self.points.get(id)
    }

    /// Returns `(id, info)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &HighlightInfo)> {
        self.points.iter().enumerate()
    }

    /// Returns the ids of selected points.
    pub fn selected_ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.iter()
            .filter(|(_, info)| info.selected)
            .map(|(id, _)| id)
    }

    /// Returns the number of selected points.
    pub fn num_selected(&self) -> usize {
        self.points.iter().filter(|info| info.selected).count()
    }

    /// Returns the number of points covered.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the state covers no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns per-point opacities in id order.
    pub fn opacities(&self, options: &Options) -> Vec<f32> {
        self.points.iter().map(|info| info.opacity(options)).collect()
    }
}

/// Computes the highlight state of every point of `cloud`.
///
/// Selections made against another cloud generation are ignored.
pub fn highlight_state(cloud: &PointCloud, selections: &SelectionManager) -> HighlightState {
    let mut points = vec![HighlightInfo::default(); cloud.len()];

    // Selections iterate in view-name order, so the first writer wins.
    for selection in selections.current_selections(cloud) {
        for id in selection.ids() {
            if let Some(info) = points.get_mut(*id) {
                if !info.selected {
                    info.selected = true;
                    info.view = Some(selection.view().to_string());
                }
            }
        }
    }

    HighlightState { points }
}
