// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

/// Persistent editor settings.
///
/// Missing keys in a config file fall back to the defaults, so a file only
/// needs to mention what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Window edge length for the median filter (odd, >= 3).
    pub median_window: u32,
    /// How many leading bytes the hex view shows.
    pub hex_dump_limit: usize,
    /// File name prefix used by "save" (as opposed to "save as").
    pub edited_prefix: String,
    /// JPEG quality (1-100) when saving to JPEG.
    pub jpeg_quality: u8,
    /// Fixed seed for the noise generator; `None` seeds from the OS.
    pub noise_seed: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            median_window: 5,
            hex_dump_limit: 128,
            edited_prefix: "edited_".into(),
            jpeg_quality: 95,
            noise_seed: None,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.median_window < 3 || self.median_window % 2 == 0 {
            return Err(BildwerkError::InvalidArgument(format!(
                "median_window must be odd and >= 3, got {}",
                self.median_window
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(BildwerkError::InvalidArgument(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "median_window": 7 }"#).unwrap();
        assert_eq!(config.median_window, 7);
        assert_eq!(config.hex_dump_limit, 128);
        assert_eq!(config.edited_prefix, "edited_");
    }

    #[test]
    fn even_window_is_rejected() {
        let err = EditorConfig::from_json(r#"{ "median_window": 4 }"#).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidArgument(_)));
    }

    #[test]
    fn zero_jpeg_quality_is_rejected() {
        let err = EditorConfig::from_json(r#"{ "jpeg_quality": 0 }"#).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidArgument(_)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = EditorConfig::from_json("{ median_window").unwrap_err();
        assert!(matches!(err, BildwerkError::Serialization(_)));
    }

    #[test]
    fn load_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bildwerk.json");
        let config = EditorConfig {
            noise_seed: Some(42),
            ..EditorConfig::default()
        };
        std::fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }
}
