//! Shared visual metrics and colors.
//!
//! A [`Theme`] is attached to the root when a screen is created and is
//! propagated to every widget added below it. Widgets read font sizes,
//! header heights and colors from their theme during layout and drawing.
//!
//! Themes can be loaded from JSON or TOML. Missing fields keep their
//! defaults, so a document only needs to name what it changes:
//!
//! ```ignore
//! let theme = Theme::from_toml_str(r#"
//!     window_header_height = 36
//!     [window_popup]
//!     r = 0.2
//!     g = 0.2
//!     b = 0.25
//!     a = 1.0
//! "#)?;
//! ```

use serde::{Deserialize, Serialize};
use trellis_core::Color;

use crate::error::ConfigError;

/// Font names and sizes, spacing metrics, and the color palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    // =========================================================================
    // Fonts
    // =========================================================================
    /// Regular text font.
    pub font_normal: String,
    /// Bold font, used for window titles and buttons.
    pub font_bold: String,
    /// Icon font, used for dialog glyphs.
    pub font_icons: String,

    // =========================================================================
    // Metrics
    // =========================================================================
    pub standard_font_size: i32,
    pub button_font_size: i32,
    pub tooltip_font_size: i32,
    pub window_title_font_size: i32,
    pub window_corner_radius: i32,
    pub window_header_height: i32,
    pub window_drop_shadow_size: i32,
    pub button_corner_radius: i32,

    // =========================================================================
    // Colors
    // =========================================================================
    pub drop_shadow: Color,
    pub transparent: Color,
    pub border_dark: Color,
    pub border_light: Color,
    pub border_medium: Color,
    pub text_color: Color,
    pub disabled_text_color: Color,
    pub text_color_shadow: Color,
    pub button_fill: Color,
    pub button_fill_pushed: Color,
    pub window_fill_unfocused: Color,
    pub window_fill_focused: Color,
    pub window_title_unfocused: Color,
    pub window_title_focused: Color,
    pub window_header_top: Color,
    pub window_header_bottom: Color,
    pub window_popup: Color,
    pub window_popup_transparent: Color,
    pub window_keyboard: Color,
    pub tooltip_background: Color,
    pub tooltip_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_normal: "sans".into(),
            font_bold: "sans-bold".into(),
            font_icons: "icons".into(),

            standard_font_size: 16,
            button_font_size: 20,
            tooltip_font_size: 15,
            window_title_font_size: 18,
            window_corner_radius: 2,
            window_header_height: 30,
            window_drop_shadow_size: 10,
            button_corner_radius: 2,

            drop_shadow: Color::gray(0, 128),
            transparent: Color::gray(0, 0),
            border_dark: Color::gray(29, 255),
            border_light: Color::gray(92, 255),
            border_medium: Color::gray(35, 255),
            text_color: Color::gray(255, 160),
            disabled_text_color: Color::gray(255, 80),
            text_color_shadow: Color::gray(0, 160),
            button_fill: Color::gray(74, 255),
            button_fill_pushed: Color::gray(41, 255),
            window_fill_unfocused: Color::gray(43, 230),
            window_fill_focused: Color::gray(45, 230),
            window_title_unfocused: Color::gray(220, 160),
            window_title_focused: Color::gray(255, 190),
            window_header_top: Color::gray(74, 255),
            window_header_bottom: Color::gray(58, 255),
            window_popup: Color::gray(50, 255),
            window_popup_transparent: Color::gray(50, 0),
            window_keyboard: Color::gray(50, 255),
            tooltip_background: Color::BLACK,
            tooltip_text: Color::WHITE,
        }
    }
}

impl Theme {
    /// Parse a theme from JSON, filling unspecified fields with defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let theme: Theme = serde_json::from_str(source)?;
        theme.validate()?;
        Ok(theme)
    }

    /// Parse a theme from TOML, filling unspecified fields with defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let theme: Theme = toml::from_str(source)?;
        theme.validate()?;
        Ok(theme)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("standard_font_size", self.standard_font_size),
            ("button_font_size", self.button_font_size),
            ("tooltip_font_size", self.tooltip_font_size),
            ("window_title_font_size", self.window_title_font_size),
            ("window_header_height", self.window_header_height),
        ];
        for (field, value) in sizes {
            if value <= 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if self.window_drop_shadow_size < 0 {
            return Err(ConfigError::InvalidValue {
                field: "window_drop_shadow_size",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

static_assertions::assert_impl_all!(Theme: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metrics() {
        let theme = Theme::default();
        assert_eq!(theme.window_header_height, 30);
        assert_eq!(theme.standard_font_size, 16);
        assert_eq!(theme.window_fill_focused.to_rgba8(), [45, 45, 45, 230]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let theme = Theme::from_json_str(r#"{ "window_header_height": 40 }"#).unwrap();
        assert_eq!(theme.window_header_height, 40);
        assert_eq!(theme.button_font_size, 20);
        assert_eq!(theme.font_bold, "sans-bold");
    }

    #[test]
    fn test_toml_colors() {
        let theme = Theme::from_toml_str(
            r#"
            standard_font_size = 18
            [window_popup]
            r = 1.0
            g = 0.0
            b = 0.0
            a = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(theme.standard_font_size, 18);
        assert_eq!(theme.window_popup, Color::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_rejects_non_positive_font() {
        let err = Theme::from_json_str(r#"{ "standard_font_size": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "standard_font_size",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Theme::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
