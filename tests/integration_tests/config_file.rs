// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use appoptics_config::configuration::{
    Config, Delta, ReporterType, TracingMode, DEFAULT_SSL_COLLECTOR,
};
use appoptics_config::log::LevelFilter;
use serial_test::serial;

use super::{EnvGuard, KEY};

const YAML_CONFIG: &str = r#"
Collector: yaml.test.com
ServiceKey: ae38315f6116585d64d82ec2455aa3ec61e02fee25d286f74ace9e4fea189217:yaml
TrustedPath: /yaml-collector.crt
CollectorUDP: yamludp.test.com
ReporterType: udp
Sampling:
  TracingMode: disabled
  SampleRate: 100
PrependDomain: true
HostAlias: yaml-alias
SkipVerify: true
Precision: 6
ReporterProperties:
  EventFlushInterval: 6
  EventFlushBatchSize: 6000
  MetricFlushInterval: 30
TransactionSettings:
  - Type: url
    RegEx: \s+\d+\s+
    Tracing: disabled
  - Type: url
    Extensions: [".jpg"]
    Tracing: disabled
Disabled: true
DebugLevel: info
"#;

fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
#[serial]
fn test_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "appoptics-config.yaml", YAML_CONFIG);
    let _env = EnvGuard::new(&[("APPOPTICS_CONFIG_FILE", path.as_str())]);

    let config = Config::builder().build();
    assert_eq!(config.collector(), "yaml.test.com");
    assert_eq!(
        config.service_key(),
        "ae38315f6116585d64d82ec2455aa3ec61e02fee25d286f74ace9e4fea189217:yaml"
    );
    assert_eq!(config.trusted_path(), "/yaml-collector.crt");
    assert_eq!(config.reporter_type(), ReporterType::Udp);
    assert_eq!(config.reporter_endpoint(), "yamludp.test.com");
    assert_eq!(config.tracing_mode(), TracingMode::Disabled);
    assert_eq!(config.sample_rate(), 100);
    assert!(config.sampling_configured());
    assert!(config.prepend_domain());
    assert_eq!(config.host_alias(), "yaml-alias");
    assert!(config.skip_verify());
    assert_eq!(config.precision(), 6);
    assert_eq!(config.reporter_properties().event_flush_interval(), 6);
    assert_eq!(config.reporter_properties().event_flush_batch_size(), 6000);
    assert_eq!(config.transaction_filters().len(), 2);
    assert_eq!(
        config.transaction_tracing_mode("/a 12 b"),
        Some(TracingMode::Disabled)
    );
    assert_eq!(
        config.transaction_tracing_mode("/photo.jpg"),
        Some(TracingMode::Disabled)
    );
    assert!(config.disabled());
    assert_eq!(config.debug_level(), LevelFilter::Info);
}

#[test]
#[serial]
fn test_env_overrides_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "appoptics-config.yml", YAML_CONFIG);
    let _env = EnvGuard::new(&[
        ("APPOPTICS_CONFIG_FILE", path.as_str()),
        ("APPOPTICS_COLLECTOR", "collector.test.com"),
        ("APPOPTICS_SERVICE_KEY", KEY),
        ("APPOPTICS_REPORTER", "ssl"),
        ("APPOPTICS_TRACING_MODE", "never"),
        ("APPOPTICS_SAMPLE_RATE", "1000"),
        ("APPOPTICS_HISTOGRAM_PRECISION", "4"),
        ("APPOPTICS_EVENTS_FLUSH_INTERVAL", "4"),
    ]);

    let config = Config::builder().build();
    assert_eq!(config.collector(), "collector.test.com");
    assert_eq!(config.service_key(), KEY);
    assert_eq!(config.reporter_type(), ReporterType::Ssl);
    assert_eq!(config.reporter_endpoint(), "collector.test.com");
    assert_eq!(config.tracing_mode(), TracingMode::Disabled);
    assert_eq!(config.sample_rate(), 1000);
    assert_eq!(config.precision(), 4);
    assert_eq!(config.reporter_properties().event_flush_interval(), 4);
    // Not set in the environment, so still read from the file
    assert_eq!(config.host_alias(), "yaml-alias");
    assert_eq!(config.reporter_properties().event_flush_batch_size(), 6000);
    assert_eq!(config.debug_level(), LevelFilter::Info);
}

#[test]
#[serial]
fn test_unusable_config_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_config(&dir, "appoptics-config.json", "hello");
    let missing = dir
        .path()
        .join("file-not-exist.yaml")
        .to_string_lossy()
        .into_owned();
    let malformed = write_config(&dir, "malformed.yaml", "Collector: [unclosed");

    for path in [json, missing, malformed] {
        let _env = EnvGuard::new(&[
            ("APPOPTICS_CONFIG_FILE", path.as_str()),
            ("APPOPTICS_SERVICE_KEY", KEY),
        ]);
        let config = Config::builder().build();
        assert_eq!(config.collector(), DEFAULT_SSL_COLLECTOR, "file {path}");
        assert_eq!(config.service_key(), KEY, "file {path}");
    }
}

#[test]
#[serial]
fn test_invalid_filters_in_file_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "appoptics-config.yaml",
        r#"
HostAlias: still-read
TransactionSettings:
  - Type: url
    Extensions: [".png"]
    Tracing: disabled
  - Type: url
    RegEx: \s+\d+\s+
    Extensions: [".jpg"]
    Tracing: disabled
"#,
    );
    let _env = EnvGuard::new(&[("APPOPTICS_CONFIG_FILE", path.as_str())]);

    let config = Config::builder().build();
    assert!(config.transaction_filters().is_empty());
    assert_eq!(config.transaction_tracing_mode("/logo.png"), None);
    assert_eq!(config.host_alias(), "still-read");
}

#[test]
#[serial]
fn test_delta_of_yaml_config_masks_service_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "appoptics-config.yaml", YAML_CONFIG);
    let _env = EnvGuard::new(&[("APPOPTICS_CONFIG_FILE", path.as_str())]);

    let config = Config::builder().build();
    let delta = Delta::between(&Config::default(), &config).sanitize();
    let report = delta.to_string();

    assert!(report.contains(" - Collector (APPOPTICS_COLLECTOR) = yaml.test.com (default: "));
    assert!(report.contains(
        " - Sampling.TracingMode (APPOPTICS_TRACING_MODE) = disabled (default: enabled)"
    ));
    assert!(report.contains(" - TransactionSettings = "));
    assert!(!report.contains("ae38315f6116585d64d82ec2455aa3ec61e02fee25d286f74ace9e4fea189217"));
    assert!(!report.contains("MetricFlushInterval"));
    assert_eq!(report.lines().count(), delta.entries().len());
}
