//! Engine tunables.
//!
//! Defaults are sized for a pixel host; the terminal demo constructs its own
//! cell-sized values. Everything here is plain data with serde defaults so a
//! host can override any subset from a TOML file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::Size;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideConfig {
    #[serde(default)]
    pub tooltip: TooltipConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl GuideConfig {
    /// Loads overrides from a TOML file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Tooltip metrics: nominal size plus the margins the layout engine keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TooltipConfig {
    #[serde(default = "default_tooltip_width")]
    pub width: f64,
    #[serde(default = "default_tooltip_height")]
    pub height: f64,
    /// Margin kept clear of every viewport edge.
    #[serde(default = "default_screen_padding")]
    pub screen_padding: f64,
    /// Gap between the target and the tooltip, spanned by the arrow.
    #[serde(default = "default_arrow_clearance")]
    pub arrow_clearance: f64,
    /// Keeps the arrow off the tooltip's rounded corners.
    #[serde(default = "default_arrow_inset")]
    pub arrow_inset: f64,
    /// How far the spotlight cut-out extends past the target on each side.
    #[serde(default = "default_spotlight_margin")]
    pub spotlight_margin: f64,
}

impl TooltipConfig {
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            width: default_tooltip_width(),
            height: default_tooltip_height(),
            screen_padding: default_screen_padding(),
            arrow_clearance: default_arrow_clearance(),
            arrow_inset: default_arrow_inset(),
            spotlight_margin: default_spotlight_margin(),
        }
    }
}

fn default_tooltip_width() -> f64 {
    320.0
}

fn default_tooltip_height() -> f64 {
    180.0
}

fn default_screen_padding() -> f64 {
    16.0
}

fn default_arrow_clearance() -> f64 {
    12.0
}

fn default_arrow_inset() -> f64 {
    24.0
}

fn default_spotlight_margin() -> f64 {
    6.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Wait after a scroll-into-view request before trusting the target's
    /// measured position. Empirical, tied to the host's smooth-scroll
    /// duration; tune it, don't read meaning into it.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl TimingConfig {
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_settle_delay_ms() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GuideConfig::default();
        assert_eq!(config.tooltip.width, 320.0);
        assert_eq!(config.tooltip.height, 180.0);
        assert_eq!(config.timing.settle_delay(), Duration::from_millis(600));
    }

    #[test]
    fn test_partial_toml_override_keeps_defaults() {
        let config: GuideConfig = toml::from_str(
            r#"
            [tooltip]
            width = 44.0
            height = 11.0

            [timing]
            settle_delay_ms = 150
            "#,
        )
        .unwrap();
        assert_eq!(config.tooltip.width, 44.0);
        assert_eq!(config.tooltip.screen_padding, 16.0);
        assert_eq!(config.timing.settle_delay_ms, 150);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = GuideConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
