// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use appoptics_config::configuration::{
    options, Config, ConfigHandle, ReporterType, TracingMode, DEFAULT_SSL_COLLECTOR,
};
use serial_test::serial;

use super::{EnvGuard, KEY};

#[test]
#[serial]
fn test_envs_loading() {
    let _env = EnvGuard::new(&[
        ("APPOPTICS_COLLECTOR", "collector.test.com"),
        ("APPOPTICS_SERVICE_KEY", KEY),
        ("APPOPTICS_TRUSTEDPATH", "/collector.crt"),
        ("APPOPTICS_COLLECTOR_UDP", "udp.test.com"),
        ("APPOPTICS_REPORTER", "udp"),
        ("APPOPTICS_TRACING_MODE", "never"),
        ("APPOPTICS_SAMPLE_RATE", "1000"),
        ("APPOPTICS_PREPEND_DOMAIN", "true"),
        ("APPOPTICS_HOSTNAME_ALIAS", "alias"),
        ("APPOPTICS_INSECURE_SKIP_VERIFY", "true"),
        ("APPOPTICS_HISTOGRAM_PRECISION", "4"),
        ("APPOPTICS_EVENTS_FLUSH_INTERVAL", "4"),
        ("APPOPTICS_EVENTS_BATCHSIZE", "4000"),
        ("APPOPTICS_DISABLED", "true"),
    ]);

    let config = Config::builder().build();
    assert_eq!(config.collector(), "collector.test.com");
    assert_eq!(config.service_key(), KEY);
    assert_eq!(config.trusted_path(), "/collector.crt");
    assert_eq!(config.collector_udp(), "udp.test.com");
    assert_eq!(config.reporter_type(), ReporterType::Udp);
    assert_eq!(config.tracing_mode(), TracingMode::Disabled);
    assert_eq!(config.sample_rate(), 1000);
    assert!(config.prepend_domain());
    assert_eq!(config.host_alias(), "alias");
    assert!(config.skip_verify());
    assert_eq!(config.precision(), 4);
    assert_eq!(config.reporter_properties().event_flush_interval(), 4);
    assert_eq!(config.reporter_properties().event_flush_batch_size(), 4000);
    assert_eq!(config.reporter_properties().metric_flush_interval(), 30);
    assert!(config.disabled());
}

#[test]
#[serial]
fn test_reload_reads_current_env() {
    let _env = EnvGuard::new(&[
        ("APPOPTICS_COLLECTOR", "example.com:12345"),
        ("APPOPTICS_PREPEND_DOMAIN", "true"),
        ("APPOPTICS_HISTOGRAM_PRECISION", "2"),
        ("APPOPTICS_SERVICE_KEY", KEY),
        ("APPOPTICS_DISABLED", "true"),
    ]);

    let handle = ConfigHandle::new(Vec::new());
    let config = handle.current();
    assert_eq!(config.collector(), "example.com:12345");
    assert!(config.prepend_domain());
    assert_eq!(config.precision(), 2);
    assert!(config.disabled());

    std::env::set_var("APPOPTICS_COLLECTOR", "test.abc:8080");
    std::env::set_var("APPOPTICS_DISABLED", "false");
    std::env::set_var("APPOPTICS_TRACING_MODE", "always");

    let config = handle.reload();
    assert_eq!(config.collector(), "test.abc:8080");
    assert!(!config.disabled());
    assert_eq!(config.tracing_mode(), TracingMode::Enabled);
    assert!(config.sampling_configured());
}

#[test]
#[serial]
fn test_reload_keeps_options() {
    let other_key = "bbbb315f6116585d64d82ec2455aa3ec61e02fee25d286f74ace9e4fea189217:Go";
    let _env = EnvGuard::new(&[("APPOPTICS_SERVICE_KEY", KEY)]);

    let handle = ConfigHandle::new(vec![
        options::with_collector("hello.world"),
        options::with_service_key(other_key),
    ]);
    assert_eq!(handle.current().collector(), "hello.world");
    assert_eq!(handle.current().service_key(), other_key.to_lowercase());

    std::env::set_var("APPOPTICS_HOSTNAME_ALIAS", "test");
    std::env::set_var("APPOPTICS_INSECURE_SKIP_VERIFY", "false");
    std::env::set_var("APPOPTICS_TRUSTED_PATH", "test.crt");
    std::env::set_var("APPOPTICS_COLLECTOR_UDP", "hello.udp");
    std::env::set_var("APPOPTICS_DISABLED", "invalidValue");

    let config = handle.reload();
    assert_eq!(config.collector(), "hello.world");
    assert_eq!(config.service_key(), other_key.to_lowercase());
    assert_eq!(config.host_alias(), "test");
    assert!(!config.skip_verify());
    assert_eq!(config.trusted_path(), "test.crt");
    assert_eq!(config.collector_udp(), "hello.udp");
    assert!(!config.disabled());
}

#[test]
#[serial]
fn test_sample_rate_out_of_range() {
    let _env = EnvGuard::new(&[("APPOPTICS_SAMPLE_RATE", "10000000")]);

    let config = Config::builder().build();
    assert_eq!(config.sample_rate(), 1_000_000);
    assert!(!config.sampling().sample_rate_configured());
    assert!(!config.sampling_configured());
    assert_eq!(config.discarded().len(), 1);
    assert_eq!(
        config.discarded()[0].to_string(),
        "invalid env, discarded - Sampling.SampleRate: 10000000 is out of range [0, 1000000]"
    );

    std::env::set_var("APPOPTICS_TRACING_MODE", "disabled");
    let config = Config::builder().build();
    assert_eq!(config.sample_rate(), 1_000_000);
    assert!(config.sampling_configured());
}

#[test]
#[serial]
fn test_empty_env_is_ignored() {
    let _env = EnvGuard::new(&[
        ("APPOPTICS_COLLECTOR", ""),
        ("APPOPTICS_TRACING_MODE", ""),
    ]);

    let config = Config::builder().build();
    assert_eq!(config.collector(), DEFAULT_SSL_COLLECTOR);
    assert!(!config.sampling_configured());
}
