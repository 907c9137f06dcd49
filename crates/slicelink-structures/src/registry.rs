//! Registry of the 2D views selections can be made in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use slicelink_core::{ConfigurationError, PointCloud, PointId};

/// Declaration of one 2D view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSpec {
    /// Unique view name, e.g. `"view-1"`.
    pub name: String,

    /// Show only the first `n` points of each group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_group_limit: Option<usize>,
}

impl ViewSpec {
    /// Creates a view that shows every point.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            per_group_limit: None,
        }
    }

    /// Limits the view to the first `limit` points of each group.
    #[must_use]
    pub fn with_per_group_limit(mut self, limit: usize) -> Self {
        self.per_group_limit = Some(limit);
        self
    }

    /// Returns the ids drawn in this view, in cloud order.
    pub fn visible_ids(&self, cloud: &PointCloud) -> Vec<PointId> {
        let Some(limit) = self.per_group_limit else {
            return cloud.ids().collect();
        };
        let mut taken: BTreeMap<&str, usize> = BTreeMap::new();
        cloud
            .points()
            .iter()
            .filter(|point| {
                let count = taken.entry(point.group()).or_default();
                *count += 1;
                *count <= limit
            })
            .map(slicelink_core::Point::id)
            .collect()
    }
}

/// Registry of declared views, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRegistry {
    views: BTreeMap<String, ViewSpec>,
}

impl ViewRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a view.
    ///
    /// Returns an error if a view with the same name already exists.
    pub fn register(&mut self, view: ViewSpec) -> Result<(), ConfigurationError> {
        if self.views.contains_key(&view.name) {
            return Err(ConfigurationError::ViewExists(view.name));
        }
        self.views.insert(view.name.clone(), view);
        Ok(())
    }

    /// Gets a view by name.
    pub fn get(&self, name: &str) -> Option<&ViewSpec> {
        self.views.get(name)
    }

    /// Gets a view by name, failing for undeclared views.
    pub fn require(&self, name: &str) -> Result<&ViewSpec, ConfigurationError> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownView(name.to_string()))
    }

    /// Checks if a view with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// Removes a view by name.
    pub fn remove(&mut self, name: &str) -> Option<ViewSpec> {
        self.views.remove(name)
    }

    /// Returns an iterator over all views in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ViewSpec> {
        self.views.values()
    }

    /// Returns the view names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    /// Returns the number of declared views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns true if no view is declared.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
