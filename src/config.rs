//! Configuration loading for the planner.
//!
//! Settings come from an optional TOML file with kebab-case keys. Every key
//! has a default, so an empty file (or no file at all) is a valid setup:
//!
//! ```toml
//! default-frequency-ghz = 5.8
//! initial-center = { lat = 20.5937, lon = 78.9629 }
//! initial-zoom = 5.0
//! fresnel-samples = 50
//! notice-duration-ms = 3000
//! ```

use anyhow::{Context, ensure};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::planner::geometry::FRESNEL_SAMPLES;
use crate::planner::types::{DEFAULT_FREQUENCY_GHZ, GeoPoint};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "towerlink.toml";

/// Highest zoom level the map view accepts.
pub const MAX_ZOOM: f64 = 19.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Frequency assigned to newly placed towers (GHz).
    pub default_frequency_ghz: f64,
    /// Map center shown at startup when no previous view was persisted.
    pub initial_center: GeoPoint,
    /// Zoom level shown at startup when no previous view was persisted.
    pub initial_zoom: f64,
    /// Number of path segments sampled for clearance polygons.
    pub fresnel_samples: usize,
    /// How long a toast stays on screen (milliseconds).
    pub notice_duration_ms: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_frequency_ghz: DEFAULT_FREQUENCY_GHZ,
            initial_center: GeoPoint::new(20.5937, 78.9629),
            initial_zoom: 5.0,
            fresnel_samples: FRESNEL_SAMPLES,
            notice_duration_ms: 3000,
        }
    }
}

impl PlannerConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path).with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {}", config_path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: PlannerConfig = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Pick the config for this run.
    ///
    /// An explicit path must exist. Without one, `towerlink.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn resolve(explicit_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match explicit_path {
            Some(path) => Self::load(&path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() { Self::load(fallback) } else { Ok(Self::default()) }
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.default_frequency_ghz.is_finite() && self.default_frequency_ghz > 0.0,
            "default-frequency-ghz must be a positive number, got {}",
            self.default_frequency_ghz
        );
        ensure!(self.fresnel_samples > 0, "fresnel-samples must be at least 1");
        ensure!(
            (0.0..=MAX_ZOOM).contains(&self.initial_zoom),
            "initial-zoom must be between 0 and {}, got {}",
            MAX_ZOOM,
            self.initial_zoom
        );
        ensure!(
            (-90.0..=90.0).contains(&self.initial_center.lat) && (-180.0..=180.0).contains(&self.initial_center.lon),
            "initial-center is not a valid coordinate: {}",
            self.initial_center
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(PlannerConfig::from_toml_str("").unwrap(), PlannerConfig::default());
    }

    #[test]
    fn partial_file_overrides_given_keys() {
        let config = PlannerConfig::from_toml_str(
            r#"
            default-frequency-ghz = 2.4
            initial-center = { lat = 47.5, lon = 19.04 }
            "#,
        )
        .unwrap();
        assert_eq!(config.default_frequency_ghz, 2.4);
        assert_eq!(config.initial_center, GeoPoint::new(47.5, 19.04));
        assert_eq!(config.fresnel_samples, FRESNEL_SAMPLES);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(PlannerConfig::from_toml_str("default-frequency-ghz = 0.0").is_err());
        assert!(PlannerConfig::from_toml_str("fresnel-samples = 0").is_err());
        assert!(PlannerConfig::from_toml_str("initial-zoom = 25.0").is_err());
        assert!(PlannerConfig::from_toml_str("initial-center = { lat = 95.0, lon = 0.0 }").is_err());
        assert!(PlannerConfig::from_toml_str("frequency = 5.8").is_err());
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let path = std::env::temp_dir().join(format!("towerlink-config-{}.toml", std::process::id()));
        std::fs::write(&path, "notice-duration-ms = 1500\n").unwrap();
        let config = PlannerConfig::load(&path).unwrap();
        assert_eq!(config.notice_duration_ms, 1500);
        std::fs::remove_file(&path).unwrap();

        let err = PlannerConfig::resolve(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
