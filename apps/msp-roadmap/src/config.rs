//! # Host Configuration
//!
//! Optional TOML file with threshold overrides:
//!
//! ```toml
//! [thresholds.dso]
//! good = 30.0
//! warn = 40.0
//! ```
//!
//! Tables and fields that are left out keep their defaults, so
//! `[thresholds.dso]` with only `good = 30.0` keeps the default `warn`.

use roadmap_core::{MetricThresholds, RoadmapError, TierThreshold};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file read when `--config` is not given. Absent is fine.
pub const DEFAULT_CONFIG_FILE: &str = "msp-roadmap.toml";

/// Maximum accepted config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Resolved host configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppConfig {
    pub thresholds: MetricThresholds,
}

/// The config file as written: every table and field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    thresholds: ThresholdOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThresholdOverrides {
    service_gm: ThresholdOverride,
    ltv_cac: ThresholdOverride,
    dso: ThresholdOverride,
    utilization: ThresholdOverride,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThresholdOverride {
    good: Option<f64>,
    warn: Option<f64>,
}

impl ThresholdOverride {
    fn apply(&self, base: TierThreshold) -> TierThreshold {
        TierThreshold::new(
            self.good.unwrap_or(base.good),
            self.warn.unwrap_or(base.warn),
        )
    }
}

impl ThresholdOverrides {
    fn apply(&self, base: MetricThresholds) -> MetricThresholds {
        MetricThresholds {
            service_gm: self.service_gm.apply(base.service_gm),
            ltv_cac: self.ltv_cac.apply(base.ltv_cac),
            dso: self.dso.apply(base.dso),
            utilization: self.utilization.apply(base.utilization),
        }
    }
}

impl AppConfig {
    /// Parse a config document over the default thresholds.
    pub fn from_toml(text: &str) -> Result<Self, RoadmapError> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| RoadmapError::ConfigError(e.to_string()))?;
        Ok(Self {
            thresholds: file.thresholds.apply(MetricThresholds::default()),
        })
    }

    /// Load the config.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RoadmapError> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    tracing::debug!("no config file, using default thresholds");
                    return Ok(Self::default());
                }
                default
            }
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            RoadmapError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(RoadmapError::ConfigError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            RoadmapError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Self::from_toml(&text)
    }
}
