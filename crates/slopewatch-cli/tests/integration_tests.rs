//! Integration tests for slopewatch-cli
//!
//! These tests wire a config file through to the service and formatter the
//! way the binary does.

use slopewatch_cli::config::OutputFormat;
use slopewatch_cli::{Config, Formatter};
use slopewatch_domain::RiskLevel;
use slopewatch_monitor::{BackendKind, MonitoringService};
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, extra: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    let data = dir.path().join("data").display().to_string();
    fs::write(
        &path,
        format!(
            "[settings]\ncolor = false\nformat = \"json\"\n\n[storage]\nbackend = \"file\"\npath = {:?}\n{}",
            data, extra
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_config_drives_service_and_formatter() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");
    let config = Config::load_from(Some(path.as_path()), dir.path().join("data")).unwrap();

    let service = MonitoringService::from_config(&config.monitor).unwrap();
    service.record_reading(85.0, 10.0, None).unwrap();

    let formatter = Formatter::new(config.settings.format, config.settings.color);
    let output = formatter
        .format_risk(service.risk_summary().unwrap().as_ref())
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["level"], "high");
    assert_eq!(value["mitigationActions"].as_array().unwrap().len(), 5);
}

#[test]
fn test_readings_survive_between_invocations() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    {
        let config = Config::load_from(Some(path.as_path()), dir.path().join("data")).unwrap();
        let service = MonitoringService::from_config(&config.monitor).unwrap();
        service.record_reading(20.0, 35.0, Some("tilted fence".to_string())).unwrap();
    }

    let config = Config::load_from(Some(path.as_path()), dir.path().join("data")).unwrap();
    let service = MonitoringService::from_config(&config.monitor).unwrap();
    let history = service.history_with_risk().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].1, RiskLevel::Moderate);
    assert_eq!(history[0].0.observation.as_deref(), Some("tilted fence"));
}

#[test]
fn test_configured_thresholds_reach_output() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "\n[thresholds]\nhigh_angle = 60.0\n");
    let config = Config::load_from(Some(path.as_path()), dir.path().join("data")).unwrap();

    let service = MonitoringService::from_config(&config.monitor).unwrap();
    service.record_reading(10.0, 50.0, None).unwrap();

    let formatter = Formatter::new(OutputFormat::Quiet, false);
    let output = formatter
        .format_risk(service.risk_summary().unwrap().as_ref())
        .unwrap();
    assert_eq!(output, "moderate");
}

#[test]
fn test_empty_history_table() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");
    let config = Config::load_from(Some(path.as_path()), dir.path().join("data")).unwrap();
    let service = MonitoringService::from_config(&config.monitor).unwrap();

    let formatter = Formatter::new(OutputFormat::Table, false);
    let output = formatter
        .format_readings(&service.history_with_risk().unwrap())
        .unwrap();
    assert!(output.contains("No readings recorded yet"));
}

#[test]
fn test_settings_only_config_still_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[settings]\nformat = \"json\"\n").unwrap();
    let data_dir = dir.path().join("data");

    let created = {
        let config = Config::load_from(Some(path.as_path()), data_dir.clone()).unwrap();
        assert_eq!(config.monitor.storage.backend, BackendKind::File);
        let service = MonitoringService::from_config(&config.monitor).unwrap();
        service.record_reading(85.0, 10.0, None).unwrap()
    };

    let config = Config::load_from(Some(path.as_path()), data_dir).unwrap();
    let service = MonitoringService::from_config(&config.monitor).unwrap();
    assert_eq!(service.history().unwrap(), vec![created]);
    assert_eq!(service.current_risk().unwrap(), Some(RiskLevel::High));
}
