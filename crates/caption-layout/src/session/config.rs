//! Session configuration

use crate::utils::Result;
use caption_core::{CaptionError, CaptionType, Color, FontColorMap};

/// Configuration for a caption session
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Format the session accepts; other sources are dropped
    pub caption_type: CaptionType,

    /// Viewer font color substitutions passed to extractors
    pub color_map: FontColorMap,

    /// Run the collision resolver after every change
    pub avoid_collisions: bool,

    /// Horizontal extent cap for every window, percent of the area width
    pub window_size: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            caption_type: CaptionType::Plain,
            color_map: FontColorMap::new(),
            avoid_collisions: true,
            window_size: 100,
        }
    }
}

impl SessionConfig {
    /// Start building a configuration for `caption_type`
    #[must_use]
    pub fn builder(caption_type: CaptionType) -> SessionConfigBuilder {
        SessionConfigBuilder::new(caption_type)
    }

    /// Check the configuration for values the session cannot use
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `window_size` is 0 or above 100.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size > 100 {
            return Err(CaptionError::Config(format!(
                "window size must be within 1-100, got {}",
                self.window_size
            ))
            .into());
        }
        Ok(())
    }
}

/// Builder for [`SessionConfig`]
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Create a builder with default values
    #[must_use]
    pub fn new(caption_type: CaptionType) -> Self {
        Self {
            config: SessionConfig {
                caption_type,
                ..SessionConfig::default()
            },
        }
    }

    /// Replace the whole color map
    #[must_use]
    pub fn color_map(mut self, color_map: FontColorMap) -> Self {
        self.config.color_map = color_map;
        self
    }

    /// Add one font color substitution
    #[must_use]
    pub fn map_color(mut self, from: Color, to: Color) -> Self {
        self.config.color_map.insert(from, to);
        self
    }

    /// Enable or disable collision avoidance
    #[must_use]
    pub fn avoid_collisions(mut self, enabled: bool) -> Self {
        self.config.avoid_collisions = enabled;
        self
    }

    /// Set the window width cap in percent
    #[must_use]
    pub fn window_size(mut self, percent: u8) -> Self {
        self.config.window_size = percent;
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// See [`SessionConfig::validate`].
    pub fn build(self) -> Result<SessionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
