// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use appoptics_config::configuration::SupportedConfigurations;

mod config_file;
mod env_loading;
mod global_handle;

pub const KEY: &str = "ae38315f6116585d64d82ec2455aa3ec61e02fee25d286f74ace9e4fea189217:go";

const ALL_FIELDS: [SupportedConfigurations; 26] = {
    use SupportedConfigurations::*;
    [
        Collector,
        ServiceKey,
        TrustedPath,
        CollectorUdp,
        ReporterType,
        TracingMode,
        SampleRate,
        PrependDomain,
        HostAlias,
        SkipVerify,
        Precision,
        EventFlushInterval,
        EventFlushBatchSize,
        MetricFlushInterval,
        GetSettingsInterval,
        SettingsTimeoutInterval,
        PingInterval,
        RetryDelayInitial,
        RetryDelayMax,
        RedirectMax,
        RetryLogThreshold,
        MaxRetries,
        TransactionSettings,
        Disabled,
        DebugLevel,
        ConfigFile,
    ]
};

/// Sets environment variables for the duration of a test, removing every agent variable before
/// and after
pub struct EnvGuard;

impl EnvGuard {
    pub fn new(vars: &[(&str, &str)]) -> Self {
        clear_env();
        for (name, value) in vars {
            std::env::set_var(name, value);
        }
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear_env();
    }
}

fn clear_env() {
    for field in ALL_FIELDS {
        for name in field.env_vars() {
            std::env::remove_var(name);
        }
    }
}
