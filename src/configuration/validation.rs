// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;

use super::service_key::is_valid_service_key;
use super::supported_configurations::SupportedConfigurations;
use crate::ao_warn;

pub const MAX_PRECISION: u32 = 10;

/// A configuration value that was rejected and replaced by its default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discarded {
    pub field: SupportedConfigurations,
    pub reason: String,
}

impl Display for Discarded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid env, discarded - {}: {}",
            self.field.as_str(),
            self.reason
        )
    }
}

/// Logs the rejection of a value
#[track_caller]
pub(crate) fn discard(field: SupportedConfigurations, reason: impl Into<String>) -> Discarded {
    let discarded = Discarded {
        field,
        reason: reason.into(),
    };
    ao_warn!("{discarded}");
    discarded
}

pub(crate) fn check_collector(collector: &str) -> Result<(), String> {
    if collector.trim().is_empty() {
        return Err("collector address is empty".to_string());
    }
    Ok(())
}

/// An empty key is accepted, the agent is then left unconfigured
pub(crate) fn check_service_key(key: &str) -> Result<(), String> {
    if key.is_empty() || is_valid_service_key(key) {
        Ok(())
    } else {
        Err("expected a 64 hex digits token and a service name, as <token>:<name>".to_string())
    }
}

pub(crate) fn check_precision(precision: u32) -> Result<(), String> {
    if precision > MAX_PRECISION {
        return Err(format!("{precision} is out of range [0, {MAX_PRECISION}]"));
    }
    Ok(())
}
