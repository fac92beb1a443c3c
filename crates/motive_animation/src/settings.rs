//! Animation host settings
//!
//! Settings can be built in code or loaded from a TOML document:
//!
//! ```toml
//! supports_scroll_animations = true
//! transition_duration = 0.25
//! transition_properties = ["opacity", "transform"]
//!
//! [scroll]
//! constant_duration = 0.15
//! inverse_delta_ramp_start = 120.0
//! ```
//!
//! Every field has a default, so an empty document is valid.

use motive_core::TargetProperty;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Top-level settings passed to [`crate::AnimationHost::new`]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnimationSettings {
    /// Whether scroll offset animations may be created
    #[serde(default = "default_true")]
    pub supports_scroll_animations: bool,
    /// Default duration of player transitions, in seconds
    #[serde(default = "default_transition_duration")]
    pub transition_duration: f64,
    /// Properties new players transition instead of applying at once
    #[serde(default)]
    pub transition_properties: Vec<TargetProperty>,
    /// Duration model of scroll offset curves
    #[serde(default)]
    pub scroll: ScrollCurveSettings,
}

/// Constants of the scroll offset curve duration model (seconds and pixels)
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScrollCurveSettings {
    /// Duration used by the constant duration behavior
    #[serde(default = "default_constant_duration")]
    pub constant_duration: f64,
    /// Upper bound of the delta-based duration behavior
    #[serde(default = "default_delta_based_max_duration")]
    pub delta_based_max_duration: f64,
    /// Scroll distance at which the inverse-delta ramp starts
    #[serde(default = "default_inverse_delta_ramp_start")]
    pub inverse_delta_ramp_start: f64,
    /// Scroll distance at which the inverse-delta ramp ends
    #[serde(default = "default_inverse_delta_ramp_end")]
    pub inverse_delta_ramp_end: f64,
    /// Shortest inverse-delta duration (reached at the end of the ramp)
    #[serde(default = "default_inverse_delta_min_duration")]
    pub inverse_delta_min_duration: f64,
    /// Longest inverse-delta duration (used before the ramp starts)
    #[serde(default = "default_inverse_delta_max_duration")]
    pub inverse_delta_max_duration: f64,
}

fn default_true() -> bool {
    true
}

fn default_transition_duration() -> f64 {
    0.3
}

fn default_constant_duration() -> f64 {
    9.0 / 60.0
}

fn default_delta_based_max_duration() -> f64 {
    12.0 / 60.0
}

fn default_inverse_delta_ramp_start() -> f64 {
    120.0
}

fn default_inverse_delta_ramp_end() -> f64 {
    480.0
}

fn default_inverse_delta_min_duration() -> f64 {
    6.0 / 60.0
}

fn default_inverse_delta_max_duration() -> f64 {
    12.0 / 60.0
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            supports_scroll_animations: default_true(),
            transition_duration: default_transition_duration(),
            transition_properties: Vec::new(),
            scroll: ScrollCurveSettings::default(),
        }
    }
}

impl Default for ScrollCurveSettings {
    fn default() -> Self {
        Self {
            constant_duration: default_constant_duration(),
            delta_based_max_duration: default_delta_based_max_duration(),
            inverse_delta_ramp_start: default_inverse_delta_ramp_start(),
            inverse_delta_ramp_end: default_inverse_delta_ramp_end(),
            inverse_delta_min_duration: default_inverse_delta_min_duration(),
            inverse_delta_max_duration: default_inverse_delta_max_duration(),
        }
    }
}

impl AnimationSettings {
    /// Parse and validate settings from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: AnimationSettings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        non_negative("transition_duration", self.transition_duration)?;
        // Scroll offsets have no keyframed curve to transition with
        if self.transition_properties.contains(&TargetProperty::ScrollOffset) {
            return Err(SettingsError::Invalid {
                field: "transition_properties",
                reason: "scroll_offset cannot be transitioned".to_string(),
            });
        }
        self.scroll.validate()
    }
}

impl ScrollCurveSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        non_negative("scroll.constant_duration", self.constant_duration)?;
        non_negative(
            "scroll.delta_based_max_duration",
            self.delta_based_max_duration,
        )?;
        non_negative(
            "scroll.inverse_delta_min_duration",
            self.inverse_delta_min_duration,
        )?;
        if self.inverse_delta_max_duration < self.inverse_delta_min_duration {
            return Err(SettingsError::Invalid {
                field: "scroll.inverse_delta_max_duration",
                reason: "must not be below inverse_delta_min_duration".to_string(),
            });
        }
        if self.inverse_delta_ramp_end <= self.inverse_delta_ramp_start {
            return Err(SettingsError::Invalid {
                field: "scroll.inverse_delta_ramp_end",
                reason: "must be greater than inverse_delta_ramp_start".to_string(),
            });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: format!("expected a non-negative number, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = AnimationSettings::from_toml_str("").unwrap();
        assert_eq!(settings, AnimationSettings::default());
        assert!(settings.supports_scroll_animations);
    }

    #[test]
    fn test_partial_document() {
        let settings = AnimationSettings::from_toml_str(
            r#"
            transition_duration = 0.5

            [scroll]
            constant_duration = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(settings.transition_duration, 0.5);
        assert_eq!(settings.scroll.constant_duration, 0.2);
        assert_eq!(settings.scroll.inverse_delta_ramp_end, 480.0);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = AnimationSettings::from_toml_str("transition_duration = -1.0").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "transition_duration",
                ..
            }
        ));

        let err = AnimationSettings::from_toml_str(
            "[scroll]\ninverse_delta_ramp_start = 500.0\ninverse_delta_ramp_end = 100.0",
        )
        .unwrap_err();
        assert!(err.to_string().contains("inverse_delta_ramp_end"));
    }

    #[test]
    fn test_transition_properties_by_name() {
        let settings = AnimationSettings::from_toml_str(
            r#"transition_properties = ["opacity", "background_color"]"#,
        )
        .unwrap();
        assert_eq!(
            settings.transition_properties,
            vec![TargetProperty::Opacity, TargetProperty::BackgroundColor]
        );

        let err = AnimationSettings::from_toml_str(r#"transition_properties = ["scroll_offset"]"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "transition_properties",
                ..
            }
        ));
        let err = AnimationSettings::from_toml_str(r#"transition_properties = ["width"]"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = AnimationSettings::from_toml_str("transition_duration = \"fast\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
