// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Overrides supplied by the application, applied on top of every other source.
//!
//! Options are kept by the [`ConfigHandle`](super::ConfigHandle) and applied again on each
//! reload.
//!
//! ```no_run
//! use appoptics_config::configuration::{options, ConfigHandle};
//!
//! let handle = ConfigHandle::new(vec![
//!     options::with_collector("collector.example.com:443"),
//!     options::with_host_alias("web-1"),
//! ]);
//! assert_eq!(handle.current().host_alias(), "web-1");
//! ```

use std::sync::Arc;

use super::configuration::{ConfigBuilder, ReporterType};
use super::sampling::TracingMode;
use super::transaction_filter::TransactionFilterSpec;
use crate::log::LevelFilter;

pub type ConfigOption = Arc<dyn Fn(&mut ConfigBuilder) + Send + Sync>;

/// Wraps any builder call into an option
pub fn option<F>(f: F) -> ConfigOption
where
    F: Fn(&mut ConfigBuilder) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn with_collector(collector: impl Into<String>) -> ConfigOption {
    let collector = collector.into();
    option(move |builder| {
        builder.set_collector(collector.clone());
    })
}

pub fn with_service_key(service_key: impl Into<String>) -> ConfigOption {
    let service_key = service_key.into();
    option(move |builder| {
        builder.set_service_key(service_key.clone());
    })
}

pub fn with_trusted_path(trusted_path: impl Into<String>) -> ConfigOption {
    let trusted_path = trusted_path.into();
    option(move |builder| {
        builder.set_trusted_path(trusted_path.clone());
    })
}

pub fn with_collector_udp(collector_udp: impl Into<String>) -> ConfigOption {
    let collector_udp = collector_udp.into();
    option(move |builder| {
        builder.set_collector_udp(collector_udp.clone());
    })
}

pub fn with_reporter_type(reporter_type: ReporterType) -> ConfigOption {
    option(move |builder| {
        builder.set_reporter_type(reporter_type);
    })
}

pub fn with_tracing_mode(tracing_mode: TracingMode) -> ConfigOption {
    option(move |builder| {
        builder.set_tracing_mode(tracing_mode);
    })
}

pub fn with_sample_rate(sample_rate: i64) -> ConfigOption {
    option(move |builder| {
        builder.set_sample_rate(sample_rate);
    })
}

pub fn with_prepend_domain(prepend_domain: bool) -> ConfigOption {
    option(move |builder| {
        builder.set_prepend_domain(prepend_domain);
    })
}

pub fn with_host_alias(host_alias: impl Into<String>) -> ConfigOption {
    let host_alias = host_alias.into();
    option(move |builder| {
        builder.set_host_alias(host_alias.clone());
    })
}

pub fn with_skip_verify(skip_verify: bool) -> ConfigOption {
    option(move |builder| {
        builder.set_skip_verify(skip_verify);
    })
}

pub fn with_precision(precision: u32) -> ConfigOption {
    option(move |builder| {
        builder.set_precision(precision);
    })
}

pub fn with_transaction_settings(filters: Vec<TransactionFilterSpec>) -> ConfigOption {
    option(move |builder| {
        builder.set_transaction_settings(filters.clone());
    })
}

pub fn with_disabled(disabled: bool) -> ConfigOption {
    option(move |builder| {
        builder.set_disabled(disabled);
    })
}

pub fn with_debug_level(debug_level: LevelFilter) -> ConfigOption {
    option(move |builder| {
        builder.set_debug_level(debug_level);
    })
}
