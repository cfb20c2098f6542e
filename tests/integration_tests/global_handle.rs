// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use appoptics_config::configuration::{options, TracingMode};
use serial_test::serial;

use super::{EnvGuard, KEY};

// The process-wide handle can only be initialized once per test binary
#[test]
#[serial]
fn test_global_handle() {
    let _env = EnvGuard::new(&[
        ("APPOPTICS_SERVICE_KEY", KEY),
        ("APPOPTICS_TRUSTEDPATH", "/collector.crt"),
        ("APPOPTICS_SAMPLE_RATE", "10000000"),
    ]);

    let handle = appoptics_config::init(vec![options::with_host_alias("web-1")]);
    let first = handle.current();

    assert_eq!(appoptics_config::service_key(), KEY);
    assert_eq!(appoptics_config::host_alias(), "web-1");
    assert_eq!(appoptics_config::trusted_path(), "/collector.crt");
    assert_eq!(appoptics_config::collector(), "collector.appoptics.com:443");
    assert_eq!(appoptics_config::collector_udp(), "");
    assert!(!appoptics_config::skip_verify());
    assert!(!appoptics_config::disabled());
    assert_eq!(appoptics_config::sample_rate(), 1_000_000);
    assert_eq!(appoptics_config::tracing_mode(), TracingMode::Enabled);
    assert!(!appoptics_config::sampling_configured());

    // A second initialization does not replace the options
    let again = appoptics_config::init(vec![options::with_host_alias("web-2")]);
    assert!(std::ptr::eq(handle, again));
    assert_eq!(appoptics_config::host_alias(), "web-1");

    std::env::set_var("APPOPTICS_SAMPLE_RATE", "5000");
    std::env::set_var("APPOPTICS_INSECURE_SKIP_VERIFY", "true");
    appoptics_config::reload();

    assert_eq!(appoptics_config::sample_rate(), 5000);
    assert!(appoptics_config::sampling_configured());
    assert!(appoptics_config::skip_verify());
    assert_eq!(appoptics_config::host_alias(), "web-1");

    // Snapshots taken before the reload are left untouched
    assert_eq!(first.sample_rate(), 1_000_000);
    assert!(!first.skip_verify());
}
