// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration resolution for the AppOptics tracing agent.
//!
//! The process-wide configuration is resolved on first use, and can be rebuilt with [`reload`]:
//!
//! ```no_run
//! use appoptics_config::configuration::options;
//!
//! appoptics_config::init(vec![options::with_host_alias("web-1")]);
//! if appoptics_config::sampling_configured() {
//!     let _rate = appoptics_config::sample_rate();
//! }
//! ```

pub mod configuration;
pub use configuration::Config;
pub use configuration::handle::{
    collector, collector_udp, current, disabled, global, host_alias, init, reload, sample_rate,
    sampling_configured, service_key, skip_verify, tracing_mode, trusted_path,
};

mod error;
pub use error::{FileError, FilterError};

pub mod log;
