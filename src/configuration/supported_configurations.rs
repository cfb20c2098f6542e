// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Every configuration field the agent understands.
///
/// Each field knows the path used for it in the configuration file and in the startup delta
/// report, and the environment variable(s) it is bound to. The declaration order is the order in
/// which fields are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedConfigurations {
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
    /// Location of the configuration file. Only read from the environment.
    ConfigFile,
}

impl SupportedConfigurations {
    /// Dotted path of the field, relative to the root of the configuration
    pub const fn as_str(&self) -> &'static str {
        use SupportedConfigurations::*;
        match self {
            Collector => "Collector",
            ServiceKey => "ServiceKey",
            TrustedPath => "TrustedPath",
            CollectorUdp => "CollectorUDP",
            ReporterType => "ReporterType",
            TracingMode => "Sampling.TracingMode",
            SampleRate => "Sampling.SampleRate",
            PrependDomain => "PrependDomain",
            HostAlias => "HostAlias",
            SkipVerify => "SkipVerify",
            Precision => "Precision",
            EventFlushInterval => "ReporterProperties.EventFlushInterval",
            EventFlushBatchSize => "ReporterProperties.EventFlushBatchSize",
            MetricFlushInterval => "ReporterProperties.MetricFlushInterval",
            GetSettingsInterval => "ReporterProperties.GetSettingsInterval",
            SettingsTimeoutInterval => "ReporterProperties.SettingsTimeoutInterval",
            PingInterval => "ReporterProperties.PingInterval",
            RetryDelayInitial => "ReporterProperties.RetryDelayInitial",
            RetryDelayMax => "ReporterProperties.RetryDelayMax",
            RedirectMax => "ReporterProperties.RedirectMax",
            RetryLogThreshold => "ReporterProperties.RetryLogThreshold",
            MaxRetries => "ReporterProperties.MaxRetries",
            TransactionSettings => "TransactionSettings",
            Disabled => "Disabled",
            DebugLevel => "DebugLevel",
            ConfigFile => "ConfigFile",
        }
    }

    /// Name of the environment variable bound to this field, if any
    pub const fn env_var(&self) -> Option<&'static str> {
        match self.env_vars() {
            [first, ..] => Some(*first),
            [] => None,
        }
    }

    /// Every environment variable bound to this field, the canonical name first
    pub const fn env_vars(&self) -> &'static [&'static str] {
        use SupportedConfigurations::*;
        match self {
            Collector => &["APPOPTICS_COLLECTOR"],
            ServiceKey => &["APPOPTICS_SERVICE_KEY"],
            TrustedPath => &["APPOPTICS_TRUSTEDPATH", "APPOPTICS_TRUSTED_PATH"],
            CollectorUdp => &["APPOPTICS_COLLECTOR_UDP"],
            ReporterType => &["APPOPTICS_REPORTER"],
            TracingMode => &["APPOPTICS_TRACING_MODE"],
            SampleRate => &["APPOPTICS_SAMPLE_RATE"],
            PrependDomain => &["APPOPTICS_PREPEND_DOMAIN"],
            HostAlias => &["APPOPTICS_HOSTNAME_ALIAS"],
            SkipVerify => &["APPOPTICS_INSECURE_SKIP_VERIFY"],
            Precision => &["APPOPTICS_HISTOGRAM_PRECISION"],
            EventFlushInterval => &["APPOPTICS_EVENTS_FLUSH_INTERVAL"],
            EventFlushBatchSize => &["APPOPTICS_EVENTS_BATCHSIZE"],
            MetricFlushInterval => &["APPOPTICS_METRIC_FLUSH_INTERVAL"],
            GetSettingsInterval => &["APPOPTICS_GET_SETTINGS_INTERVAL"],
            SettingsTimeoutInterval => &["APPOPTICS_SETTINGS_TIMEOUT_INTERVAL"],
            PingInterval => &["APPOPTICS_PING_INTERVAL"],
            RetryDelayInitial => &["APPOPTICS_RETRY_DELAY_INITIAL"],
            RetryDelayMax => &["APPOPTICS_RETRY_DELAY_MAX"],
            RedirectMax => &["APPOPTICS_REDIRECT_MAX"],
            RetryLogThreshold => &["APPOPTICS_RETRY_LOG_THRESHOLD"],
            MaxRetries => &["APPOPTICS_MAX_RETRIES"],
            TransactionSettings => &[],
            Disabled => &["APPOPTICS_DISABLED"],
            DebugLevel => &["APPOPTICS_DEBUG_LEVEL"],
            ConfigFile => &["APPOPTICS_CONFIG_FILE"],
        }
    }

    /// Whether the field can be set from the configuration file
    pub const fn in_file(&self) -> bool {
        !matches!(self, SupportedConfigurations::ConfigFile)
    }
}
