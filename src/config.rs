//! Site configuration from folio.toml

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::PageOptions;
use crate::state::{SettleMode, HEADER_OFFSET};
use crate::types::{ScrollBehavior, SectionId, ViewportBand};

/// Tunables for the tracker, the hand-off and the contact form.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Height of the fixed header a scrolled-to section must clear
    pub header_offset: f32,

    /// Band top edge, in percent of the viewport height from the top
    pub band_top_percent: f32,

    /// Band bottom edge, in percent of the viewport height from the bottom
    pub band_bottom_percent: f32,

    /// When a cross-page hand-off fires
    pub settle_mode: SettleMode,

    /// Delay used by `settle_mode = "fixed_delay"`
    pub settle_delay_ms: u64,

    /// Give up waiting for a hand-off target after this long
    pub handoff_timeout_ms: u64,

    /// Smooth or instant scrolling
    pub smooth_scroll: bool,

    /// Contact form status returns to idle after this long
    pub status_reset_ms: u64,

    /// Projects shown in the home page "works" section
    pub featured_projects: usize,

    /// Address contact messages are delivered to
    pub contact_email: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            header_offset: HEADER_OFFSET,
            band_top_percent: 20.0,
            band_bottom_percent: 60.0,
            settle_mode: SettleMode::Readiness,
            settle_delay_ms: 100,
            handoff_timeout_ms: 1500,
            smooth_scroll: true,
            status_reset_ms: 5000,
            featured_projects: 4,
            contact_email: "hello@example.com".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file and validate it
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SiteConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading, parsing or validating the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.header_offset.is_finite() || self.header_offset < 0.0 {
            return Err(ConfigError::Invalid {
                field: "header_offset",
                reason: format!("must be a non-negative number, got {}", self.header_offset),
            });
        }

        for (field, value) in [
            ("band_top_percent", self.band_top_percent),
            ("band_bottom_percent", self.band_bottom_percent),
        ] {
            if !(0.0..100.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be in [0, 100), got {value}"),
                });
            }
        }

        if self.band_top_percent + self.band_bottom_percent >= 100.0 {
            return Err(ConfigError::Invalid {
                field: "band_bottom_percent",
                reason: format!(
                    "band insets {} + {} leave no visible band",
                    self.band_top_percent, self.band_bottom_percent
                ),
            });
        }

        Ok(())
    }

    pub fn band(&self) -> ViewportBand {
        ViewportBand::from_percent(self.band_top_percent, self.band_bottom_percent)
    }

    pub fn status_reset(&self) -> Duration {
        Duration::from_millis(self.status_reset_ms)
    }

    /// Options for the home page controller
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            header_offset: self.header_offset,
            scroll_behavior: if self.smooth_scroll {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Instant
            },
            settle_mode: self.settle_mode,
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            handoff_timeout: Duration::from_millis(self.handoff_timeout_ms),
            initial_section: Some(SectionId::from("home")),
        }
    }
}

/// Errors that can occur when loading or saving site configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error when reading or writing the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing TOML
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Error serializing to TOML
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
