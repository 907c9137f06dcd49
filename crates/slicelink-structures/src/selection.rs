//! Per-view selections.
//!
//! Selections are annotations on a cloud, never filters: recording one does
//! not touch the cloud, and replacing one never merges with the previous
//! contents.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use slicelink_core::{ConfigurationError, GenerationKey, PlaneSpec, PointCloud, PointId};

use crate::registry::{ViewRegistry, ViewSpec};

/// The points brushed in one view.
///
/// The depth and plane in effect when the selection was made are captured
/// with it, so later slider or plane changes do not alter its meaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    view: String,
    ids: Vec<PointId>,
    depth: f64,
    plane: PlaneSpec,
    generation: GenerationKey,
}

impl Selection {
    /// Returns the name of the view the selection was made in.
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Returns the selected ids in selection order, without duplicates.
    pub fn ids(&self) -> &[PointId] {
        &self.ids
    }

    /// Returns the depth in effect when the selection was made.
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Returns the plane the selecting view was showing.
    pub fn plane(&self) -> PlaneSpec {
        self.plane
    }

    /// Returns the generation key of the cloud the selection was made on.
    pub fn generation(&self) -> GenerationKey {
        self.generation
    }

    /// Returns the number of selected points.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true for an explicit clear.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns whether `id` is selected.
    pub fn contains(&self, id: PointId) -> bool {
        self.ids.contains(&id)
    }
}

/// A flattened selected point, ready for tabular display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRecord {
    pub view: String,
    pub id: PointId,
    pub group: String,
    /// Horizontal coordinate in the selecting view.
    pub x: f64,
    /// Vertical coordinate in the selecting view.
    pub y: f64,
    /// Depth captured with the selection.
    pub depth: f64,
}

/// Records what has been brushed in each declared view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionManager {
    views: ViewRegistry,
    selections: BTreeMap<String, Selection>,
}

impl SelectionManager {
    /// Creates a manager over a set of declared views.
    pub fn new(views: ViewRegistry) -> Self {
        Self {
            views,
            selections: BTreeMap::new(),
        }
    }

    /// Creates a manager declaring the given views.
    pub fn with_views<I>(views: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = ViewSpec>,
    {
        let mut registry = ViewRegistry::new();
        for view in views {
            registry.register(view)?;
        }
        Ok(Self::new(registry))
    }

    /// Returns the declared views.
    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// Replaces the selection of `view`.
    ///
    /// Ids not present in `cloud` are dropped: they come from a previous cloud
    /// generation. Passing no ids records an explicit empty selection.
    pub fn set_selection<I>(
        &mut self,
        view: &str,
        ids: I,
        depth_at_selection: f64,
        plane: PlaneSpec,
        cloud: &PointCloud,
    ) -> Result<&Selection, ConfigurationError>
    where
        I: IntoIterator<Item = PointId>,
    {
        self.views.require(view)?;
        if !depth_at_selection.is_finite() {
            return Err(ConfigurationError::NonFiniteDepth(depth_at_selection));
        }

        let mut seen = HashSet::new();
        let mut stale = 0usize;
        let ids: Vec<PointId> = ids
            .into_iter()
            .filter(|id| {
                if cloud.contains(*id) {
                    seen.insert(*id)
                } else {
                    stale += 1;
                    false
                }
            })
            .collect();
        if stale > 0 {
            log::debug!("selection in '{view}': ignored {stale} ids not in the current cloud");
        }

        let selection = Selection {
            view: view.to_string(),
            ids,
            depth: depth_at_selection,
            plane,
            generation: cloud.generation(),
        };
        self.selections.insert(view.to_string(), selection);
        Ok(&self.selections[view])
    }

    /// Records an explicit empty selection for `view`.
    pub fn clear(
        &mut self,
        view: &str,
        depth_at_selection: f64,
        plane: PlaneSpec,
        cloud: &PointCloud,
    ) -> Result<&Selection, ConfigurationError> {
        self.set_selection(view, std::iter::empty(), depth_at_selection, plane, cloud)
    }

    /// Forgets the selection of `view`, as if none had ever been made.
    pub fn remove(&mut self, view: &str) -> Result<Option<Selection>, ConfigurationError> {
        self.views.require(view)?;
        Ok(self.selections.remove(view))
    }

    /// Forgets every selection.
    pub fn remove_all(&mut self) {
        self.selections.clear();
    }

    /// Returns the selection of `view`, if one has been made.
    pub fn selection(&self, view: &str) -> Option<&Selection> {
        self.selections.get(view)
    }

    /// Returns every selection in view-name order.
    pub fn selections(&self) -> impl Iterator<Item = &Selection> {
        self.selections.values()
    }

    /// Returns the selections made against `cloud`, in view-name order.
    ///
    /// Selections recorded against an earlier generation are skipped.
    pub fn current_selections<'a>(
        &'a self,
        cloud: &'a PointCloud,
    ) -> impl Iterator<Item = &'a Selection> + 'a {
        let generation = cloud.generation();
        self.selections
            .values()
            .filter(move |s| s.generation == generation)
    }

    /// Returns the union of all selections.
    pub fn linked_ids(&self) -> BTreeSet<PointId> {
        self.selections
            .values()
            .flat_map(|s| s.ids.iter().copied())
            .collect()
    }

    /// Returns the ids present in every non-empty selection.
    pub fn common_ids(&self) -> BTreeSet<PointId> {
        let mut non_empty = self.selections.values().filter(|s| !s.is_empty());
        let Some(first) = non_empty.next() else {
            return BTreeSet::new();
        };
        let mut common: BTreeSet<PointId> = first.ids.iter().copied().collect();
        for selection in non_empty {
            common.retain(|id| selection.contains(*id));
        }
        common
    }

    /// Flattens every selection into display rows.
    ///
    /// Only selections made against `cloud` produce rows.
    pub fn selection_records(&self, cloud: &PointCloud) -> Vec<SelectionRecord> {
        self.current_selections(cloud)
            .flat_map(|selection| {
                selection.ids.iter().filter_map(move |id| {
                    let point = cloud.get(*id)?;
                    let (planar, _) = selection.plane.split(point.position());
                    Some(SelectionRecord {
                        view: selection.view.clone(),
                        id: *id,
                        group: point.group().to_string(),
                        x: planar.x,
                        y: planar.y,
                        depth: selection.depth,
                    })
                })
            })
            .collect()
    }
}
