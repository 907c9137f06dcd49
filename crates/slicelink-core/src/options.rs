//! Presentation-independent options shared by every view.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::slice::{SliceQuery, Tolerance};

/// Global options for linked views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Opacity of points outside every selection (selected points are fully
    /// opaque).
    pub unselected_opacity: f32,

    /// Tolerance used when an equality slice is requested without one.
    pub default_tolerance: Tolerance,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            unselected_opacity: 0.3,
            default_tolerance: Tolerance::default(),
        }
    }
}

impl Options {
    /// Checks that every option is in range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if (0.0..=1.0).contains(&self.unselected_opacity) {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidOpacity(self.unselected_opacity))
        }
    }

    /// Creates an equality slice at `value` using [`Self::default_tolerance`].
    pub fn equality_slice(&self, value: f64) -> Result<SliceQuery, ConfigurationError> {
        SliceQuery::equality(value, self.default_tolerance.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!((options.unselected_opacity - 0.3).abs() < f32::EPSILON);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let options: Options = serde_json::from_str(r#"{"unselected_opacity": 0.5}"#).unwrap();
        assert!((options.unselected_opacity - 0.5).abs() < f32::EPSILON);
        assert_eq!(options.default_tolerance, Tolerance::default());
    }

    #[test]
    fn test_equality_slice_uses_default_tolerance() {
        let options = Options {
            default_tolerance: Tolerance::new(0.2).unwrap(),
            ..Options::default()
        };
        let query = options.equality_slice(1.5).unwrap();
        assert_eq!(query, SliceQuery::equality(1.5, 0.2).unwrap());
        assert!(options.equality_slice(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_opacity() {
        let options = Options {
            unselected_opacity: 1.5,
            ..Options::default()
        };
        assert_eq!(
            options.validate(),
            Err(ConfigurationError::InvalidOpacity(1.5))
        );
    }
}
