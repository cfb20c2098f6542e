// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;

use super::configuration::Config;
use super::service_key::mask_service_key;
use super::supported_configurations::SupportedConfigurations;

/// A field whose resolved value differs from its default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaEntry {
    pub field: SupportedConfigurations,
    pub value: String,
    pub default: String,
}

impl Display for DeltaEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " - {}", self.field.as_str())?;
        if let Some(env) = self.field.env_var() {
            write!(f, " ({env})")?;
        }
        write!(f, " = {} (default: {})", self.value, self.default)
    }
}

/// Fields of a configuration that differ from another one, in report order.
///
/// Renders one entry per line. Call [`Delta::sanitize`] before logging it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta(Vec<DeltaEntry>);

impl Delta {
    pub fn between(default: &Config, resolved: &Config) -> Self {
        Delta(
            default
                .entries()
                .into_iter()
                .zip(resolved.entries())
                .filter(|(default, resolved)| default.value != resolved.value)
                .map(|(default, resolved)| DeltaEntry {
                    field: resolved.name,
                    value: resolved.value,
                    default: default.value,
                })
                .collect(),
        )
    }

    /// Masks the service keys wherever they appear
    pub fn sanitize(mut self) -> Self {
        let secrets: Vec<(String, String)> = self
            .0
            .iter()
            .filter(|entry| entry.field == SupportedConfigurations::ServiceKey)
            .flat_map(|entry| [&entry.value, &entry.default])
            .filter(|key| !key.is_empty())
            .map(|key| (key.clone(), mask_service_key(key)))
            .collect();

        for entry in &mut self.0 {
            for (secret, masked) in &secrets {
                entry.value = entry.value.replace(secret.as_str(), masked);
                entry.default = entry.default.replace(secret.as_str(), masked);
            }
        }
        self
    }

    pub fn entries(&self) -> &[DeltaEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
