//! Screen construction settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use trellis_core::Vector2i;

use crate::error::ConfigError;

/// Settings a [`Screen`](super::Screen) is created with.
///
/// Every field has a default, so partial documents are accepted:
///
/// ```ignore
/// let config = ScreenConfig::from_toml_str(r#"
///     caption = "Kiosk"
///     size = { x = 800, y = 480 }
///     tooltip_delay_ms = 750
/// "#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Initial size of the root widget.
    pub size: Vector2i,
    /// Native window caption.
    pub caption: String,
    /// Subtracted from every raw pointer position.
    pub pointer_offset: Vector2i,
    /// Idle time before a tooltip appears.
    pub tooltip_delay_ms: u64,
    /// Whether raw input is dispatched at all.
    pub process_events: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            size: Vector2i::new(800, 600),
            caption: "Trellis".to_owned(),
            pointer_offset: Vector2i::ZERO,
            tooltip_delay_ms: 500,
            process_events: true,
        }
    }
}

impl ScreenConfig {
    pub fn new(caption: impl Into<String>, size: impl Into<Vector2i>) -> Self {
        Self {
            caption: caption.into(),
            size: size.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()
    }

    pub fn tooltip_delay(&self) -> Duration {
        Duration::from_millis(self.tooltip_delay_ms)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.size.x < 0 || self.size.y < 0 {
            return Err(ConfigError::InvalidValue {
                field: "size",
                reason: format!("must not be negative, got {}", self.size),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScreenConfig::default();
        assert_eq!(config.pointer_offset, Vector2i::ZERO);
        assert_eq!(config.tooltip_delay(), Duration::from_millis(500));
        assert!(config.process_events);
    }

    #[test]
    fn test_partial_json() {
        let config =
            ScreenConfig::from_json_str(r#"{ "caption": "Panel", "size": { "x": 320, "y": 240 } }"#)
                .unwrap();
        assert_eq!(config.caption, "Panel");
        assert_eq!(config.size, Vector2i::new(320, 240));
        assert_eq!(config.tooltip_delay_ms, 500);
    }

    #[test]
    fn test_toml() {
        let config = ScreenConfig::from_toml_str(
            "caption = \"Kiosk\"\nprocess_events = false\npointer_offset = { x = 1, y = 2 }\n",
        )
        .unwrap();
        assert!(!config.process_events);
        assert_eq!(config.pointer_offset, Vector2i::new(1, 2));
    }

    #[test]
    fn test_rejects_negative_size() {
        let err = ScreenConfig::from_json_str(r#"{ "size": { "x": -1, "y": 10 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "size", .. }));
        assert!(ScreenConfig::from_toml_str("size = 3").is_err());
    }
}
