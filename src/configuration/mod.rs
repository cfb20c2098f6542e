// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration of the AppOptics agent
//!
//! # Sources of configuration
//!
//! ```text
//! ^ Highest precedence
//! |
//! * ConfigBuilder setters and options
//! |
//! * "APPOPTICS_" prefixed env variables
//! |
//! * YAML file pointed by APPOPTICS_CONFIG_FILE
//! |
//! * Default values
//! |
//! v Lowest level of precedence
//! ```
//!
//! Invalid values never prevent the agent from starting. They are logged and replaced by their
//! default.

#[allow(clippy::module_inception)]
mod configuration;
mod delta;
pub(crate) mod handle;
pub mod options;
mod sampling;
mod service_key;
mod sources;
mod supported_configurations;
mod transaction_filter;
mod validation;

pub use configuration::{
    Config, ConfigBuilder, ConfigurationEntry, ReporterOptions, ReporterType,
    DEFAULT_PRECISION, DEFAULT_SSL_COLLECTOR, DEFAULT_UDP_COLLECTOR,
};
pub use delta::{Delta, DeltaEntry};
pub use handle::ConfigHandle;
pub use options::ConfigOption;
pub use sampling::{SamplingConfig, TracingMode, MAX_SAMPLE_RATE};
pub use service_key::{is_valid_service_key, mask_service_key, normalize_service_key};
pub use sources::{ConfigSourceOrigin, ConfigurationSource, EnvSource, HashMapSource};
pub use supported_configurations::SupportedConfigurations;
pub use transaction_filter::{
    compile_filters, TransactionFilter, TransactionFilterSpec, TransactionFilters,
};
pub use validation::{Discarded, MAX_PRECISION};
