//! Tests for threshold configuration loading.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use msp_roadmap::config::AppConfig;
use roadmap_core::{MetricThresholds, RoadmapError, TierThreshold};
use std::io::Write;

#[test]
fn test_empty_document_uses_defaults() {
    let config = AppConfig::from_toml("").unwrap();
    assert_eq!(config.thresholds, MetricThresholds::default());
}

#[test]
fn test_partial_override_keeps_other_defaults() {
    let config = AppConfig::from_toml(
        r#"
[thresholds.dso]
good = 30.0
warn = 40.0
"#,
    )
    .unwrap();

    let defaults = MetricThresholds::default();
    assert_eq!(config.thresholds.dso, TierThreshold::new(30.0, 40.0));
    assert_eq!(config.thresholds.service_gm, defaults.service_gm);
    assert_eq!(config.thresholds.ltv_cac, defaults.ltv_cac);
    assert_eq!(config.thresholds.utilization, defaults.utilization);
}

#[test]
fn test_unknown_top_level_key_rejected() {
    let result = AppConfig::from_toml("colour = \"blue\"\n");
    assert!(matches!(result, Err(RoadmapError::ConfigError(_))));
}

#[test]
fn test_single_field_override_keeps_metric_default() {
    let config = AppConfig::from_toml("[thresholds.dso]\ngood = 30.0\n").unwrap();
    assert_eq!(config.thresholds.dso, TierThreshold::new(30.0, 45.0));

    let config = AppConfig::from_toml("[thresholds.ltv_cac]\nwarn = 2.0\n").unwrap();
    assert_eq!(config.thresholds.ltv_cac, TierThreshold::new(3.0, 2.0));
}

#[test]
fn test_unknown_threshold_field_rejected() {
    let result = AppConfig::from_toml("[thresholds.dso]\nbest = 20.0\n");
    assert!(matches!(result, Err(RoadmapError::ConfigError(_))));

    let result = AppConfig::from_toml("[thresholds.churn]\ngood = 1.0\n");
    assert!(matches!(result, Err(RoadmapError::ConfigError(_))));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(RoadmapError::ConfigError(_))));
}

#[test]
fn test_load_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[thresholds.utilization]\ngood = 80.0\nwarn = 75.0").unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.thresholds.utilization, TierThreshold::new(80.0, 75.0));
}

#[test]
fn test_oversized_file_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let padding = format!("# {}\n", "x".repeat(70 * 1024));
    file.write_all(padding.as_bytes()).unwrap();

    let result = AppConfig::load(Some(file.path()));
    assert!(matches!(result, Err(RoadmapError::ConfigError(_))));
}
