//! Configuration structures for palette extraction and deduplication.
//!
//! All tunable parameters live in [`ExtractionConfig`]. It can be
//! constructed programmatically or loaded from a JSON file; missing fields
//! fall back to the defaults in [`crate::constants`].
//!
//! ```no_run
//! use scan_palette::ExtractionConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = ExtractionConfig::from_json_file(Path::new("palette.json"))?;
//!
//! // Or use defaults with a different color count
//! let config = ExtractionConfig {
//!     color_count: 5,
//!     ..ExtractionConfig::default()
//! };
//! # Ok::<(), scan_palette::PaletteError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{dedup, extraction};
use crate::error::{PaletteError, Result};

/// How candidates of one extraction batch are compared against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Survivors join the comparison set as they are accepted, so a later
    /// candidate close to an earlier one in the same batch is dropped
    #[default]
    Incremental,

    /// Candidates are only compared against the collection as it stood
    /// before the batch began
    Snapshot,
}

/// Palette extraction and deduplication parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of colors returned from one image
    pub color_count: usize,

    /// Sampling step: every n-th pixel is read (1 = every pixel).
    /// Higher values are faster and less accurate.
    pub quality: usize,

    /// Decoded images whose longer side exceeds this are downscaled
    pub max_dimension: u32,

    /// Pixels with alpha below this are ignored
    pub min_alpha: u8,

    /// Euclidean RGB distance below which a candidate counts as a duplicate
    pub dedup_threshold: f64,

    /// Batch comparison policy
    pub dedup_policy: DedupPolicy,

    /// Optional upper bound on one async extraction, in milliseconds
    pub timeout_ms: Option<u64>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            color_count: extraction::DEFAULT_COLOR_COUNT,
            quality: extraction::DEFAULT_QUALITY,
            max_dimension: extraction::DEFAULT_MAX_DIMENSION,
            min_alpha: extraction::DEFAULT_MIN_ALPHA,
            dedup_threshold: dedup::DEFAULT_DISTANCE_THRESHOLD,
            dedup_policy: DedupPolicy::default(),
            timeout_ms: None,
        }
    }
}

impl ExtractionConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidParameter`] for a zero color count,
    /// zero quality, zero max dimension or a negative / non-finite threshold.
    pub fn validate(&self) -> Result<()> {
        if self.color_count == 0 {
            return Err(PaletteError::invalid_parameter("color_count", self.color_count));
        }
        if self.quality == 0 {
            return Err(PaletteError::invalid_parameter("quality", self.quality));
        }
        if self.max_dimension == 0 {
            return Err(PaletteError::invalid_parameter(
                "max_dimension",
                self.max_dimension,
            ));
        }
        if !self.dedup_threshold.is_finite() || self.dedup_threshold < 0.0 {
            return Err(PaletteError::invalid_parameter(
                "dedup_threshold",
                self.dedup_threshold,
            ));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ConfigError`] if the file cannot be read or
    /// parsed, or [`PaletteError::InvalidParameter`] if a value is out of range.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PaletteError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            PaletteError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ConfigError`] if serialization or the write fails.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PaletteError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            PaletteError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.color_count, 8);
        assert_eq!(config.dedup_threshold, 30.0);
        assert_eq!(config.dedup_policy, DedupPolicy::Incremental);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_count = ExtractionConfig {
            color_count: 0,
            ..ExtractionConfig::default()
        };
        assert!(matches!(
            zero_count.validate(),
            Err(PaletteError::InvalidParameter { ref parameter, .. }) if parameter == "color_count"
        ));

        let zero_quality = ExtractionConfig {
            quality: 0,
            ..ExtractionConfig::default()
        };
        assert!(zero_quality.validate().is_err());

        let negative = ExtractionConfig {
            dedup_threshold: -1.0,
            ..ExtractionConfig::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{ "color_count": 4, "dedup_policy": "snapshot" }"#).unwrap();
        assert_eq!(config.color_count, 4);
        assert_eq!(config.dedup_policy, DedupPolicy::Snapshot);
        assert_eq!(config.quality, extraction::DEFAULT_QUALITY);
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.json");
        let config = ExtractionConfig {
            color_count: 5,
            quality: 1,
            timeout_ms: Some(2_000),
            ..ExtractionConfig::default()
        };

        config.to_json_file(&path).unwrap();
        let loaded = ExtractionConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ExtractionConfig::from_json_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, PaletteError::ConfigError { .. }));
    }
}
