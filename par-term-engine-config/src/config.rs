//! Engine configuration file handling.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{FaceConfig, FontConfig};

/// Settings read by rendering backends at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Font requested at startup
    #[serde(default = "crate::defaults::font")]
    pub font: FontConfig,

    /// Dots per inch used to convert points into device pixels
    #[serde(default = "crate::defaults::dpi")]
    pub dpi: u32,

    /// Initial surface width in cells
    #[serde(default = "crate::defaults::columns")]
    pub columns: u16,

    /// Initial surface height in cells
    #[serde(default = "crate::defaults::rows")]
    pub rows: u16,

    /// Minimum time between presented frames (0 = unpaced)
    #[serde(default = "crate::defaults::frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Force a paint cycle every tick regardless of dirty state
    #[serde(default)]
    pub continuous_redraw: bool,

    /// Treat East Asian ambiguous-width characters as wide
    #[serde(default)]
    pub ambiguous_width_wide: bool,

    /// Number of glyph width lookups memoized per font
    #[serde(default = "crate::defaults::glyph_cache_capacity")]
    pub glyph_cache_capacity: usize,

    /// Presented frames a recording backend keeps for inspection
    #[serde(default = "crate::defaults::history_limit")]
    pub history_limit: usize,

    /// Faces added to the built-in font catalog
    #[serde(default)]
    pub extra_faces: Vec<FaceConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            font: crate::defaults::font(),
            dpi: crate::defaults::dpi(),
            columns: crate::defaults::columns(),
            rows: crate::defaults::rows(),
            frame_interval_ms: crate::defaults::frame_interval_ms(),
            continuous_redraw: false,
            ambiguous_width_wide: false,
            glyph_cache_capacity: crate::defaults::glyph_cache_capacity(),
            history_limit: crate::defaults::history_limit(),
            extra_faces: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimensions(mut self, columns: u16, rows: u16) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn with_font(mut self, family: &str, size: f32) -> Self {
        self.font.family = family.to_string();
        self.font.size = size;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_frame_interval_ms(mut self, interval: u64) -> Self {
        self.frame_interval_ms = interval;
        self
    }

    pub fn with_continuous_redraw(mut self, enabled: bool) -> Self {
        self.continuous_redraw = enabled;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Load configuration from the default path, creating it when missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Engine config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Engine config not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save_to(&config_path) {
                log::error!("Failed to save default engine config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading engine config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        let config: EngineConfig = serde_yaml_ng::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Get the configuration file path (XDG convention on all platforms but Windows)
    pub fn config_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("par-term").join("engine.yaml")
            } else {
                PathBuf::from("engine.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("par-term")
                    .join("engine.yaml")
            } else {
                PathBuf::from("engine.yaml")
            }
        }
    }

    /// Check semantic constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.font.size.is_finite() || self.font.size <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "font.size must be a positive number, got {}",
                self.font.size
            )));
        }
        if !(100..=900).contains(&self.font.weight) {
            return Err(ConfigError::Validation(format!(
                "font.weight must be within 100-900, got {}",
                self.font.weight
            )));
        }
        if self.dpi == 0 {
            return Err(ConfigError::Validation("dpi must be non-zero".into()));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::Validation(format!(
                "surface must be at least 1x1 cells, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.glyph_cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "glyph_cache_capacity must be at least 1".into(),
            ));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Validation(
                "history_limit must be at least 1".into(),
            ));
        }
        for face in &self.extra_faces {
            if face.family.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "extra_faces entries need a family name".into(),
                ));
            }
            let ratios_ok = [face.advance_ratio, face.line_ratio]
                .iter()
                .all(|r| r.is_finite() && *r > 0.0);
            if !ratios_ok {
                return Err(ConfigError::Validation(format!(
                    "face '{}' has non-positive metric ratios",
                    face.family
                )));
            }
            if face.weights.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "face '{}' must list at least one weight",
                    face.family
                )));
            }
        }
        Ok(())
    }
}
