// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{fmt::Display, str::FromStr};

use super::configuration::{ConfigItem, ConfigurationProvider, Token, ValueSourceUpdater};
use super::sources::ConfigKey;
use super::supported_configurations::SupportedConfigurations;
use super::validation::Discarded;

/// Upper bound of the sample rate, expressed in parts per million
pub const MAX_SAMPLE_RATE: i64 = 1_000_000;

/// Whether spans are recorded locally
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TracingMode {
    #[default]
    Enabled,
    Disabled,
}

impl TracingMode {
    /// Parses only the canonical tokens, without the legacy `always`/`never` synonyms
    pub(crate) fn from_canonical(s: &str) -> Option<Self> {
        match s.trim() {
            "enabled" => Some(TracingMode::Enabled),
            "disabled" => Some(TracingMode::Disabled),
            _ => None,
        }
    }
}

impl FromStr for TracingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enabled" | "always" => Ok(TracingMode::Enabled),
            "disabled" | "never" => Ok(TracingMode::Disabled),
            _ => Err(format!(
                "invalid tracing mode {s:?}, should be one of enabled, disabled, always, never"
            )),
        }
    }
}

impl Display for TracingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            TracingMode::Enabled => "enabled",
            TracingMode::Disabled => "disabled",
        };
        write!(f, "{mode}")
    }
}

/// Local sampling settings, along with whether each of them was explicitly configured.
///
/// A setting counts as configured when some source supplied a valid value for it, even if that
/// value happens to be the default. Invalid values are discarded and leave the setting
/// unconfigured, so the agent keeps deferring to the collector's sampling policy.
#[derive(Debug, Clone)]
pub struct SamplingConfig {
    tracing_mode: ConfigItem<Token<TracingMode>>,
    sample_rate: ConfigItem<i64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            tracing_mode: ConfigItem::new(SupportedConfigurations::TracingMode, Token::default()),
            sample_rate: ConfigItem::new(SupportedConfigurations::SampleRate, MAX_SAMPLE_RATE),
        }
    }
}

impl SamplingConfig {
    /// Overlays the values found in the sources, without checking them.
    ///
    /// Legacy tracing mode synonyms are already normalized, unknown tokens are kept until
    /// [`SamplingConfig::reconcile`].
    pub(crate) fn merge(
        tracing_mode: Option<ConfigKey<Token<TracingMode>>>,
        sample_rate: Option<ConfigKey<i64>>,
    ) -> Self {
        let mut sampling = SamplingConfig::default();
        if let Some(ConfigKey { value, origin }) = tracing_mode {
            sampling.tracing_mode.set_value_source(value, origin);
        }
        if let Some(ConfigKey { value, origin }) = sample_rate {
            sampling.sample_rate.set_value_source(value, origin);
        }
        sampling
    }

    /// Discards an unknown tracing mode and an out of range sample rate. A discarded setting
    /// goes back to its default and no longer counts as configured.
    pub(crate) fn reconcile(&mut self) -> Vec<Discarded> {
        let mut discarded = Vec::new();
        discarded.extend(self.tracing_mode.validate_token());
        discarded.extend(self.sample_rate.validate_with(|rate| {
            if (0..=MAX_SAMPLE_RATE).contains(rate) {
                Ok(())
            } else {
                Err(format!("{rate} is out of range [0, {MAX_SAMPLE_RATE}]"))
            }
        }));
        discarded
    }

    pub(crate) fn set_tracing_mode(&mut self, mode: TracingMode) {
        self.tracing_mode.set_code(Token::Known(mode));
    }

    pub(crate) fn set_sample_rate(&mut self, rate: i64) {
        self.sample_rate.set_code(rate);
    }

    pub(crate) fn entries(&self) -> [&dyn ConfigurationProvider; 2] {
        [&self.tracing_mode, &self.sample_rate]
    }

    pub fn tracing_mode(&self) -> TracingMode {
        self.tracing_mode.known_value()
    }

    /// Sample rate in parts per million
    pub fn sample_rate(&self) -> u32 {
        u32::try_from(*self.sample_rate.value()).unwrap_or(MAX_SAMPLE_RATE as u32)
    }

    pub fn tracing_mode_configured(&self) -> bool {
        self.tracing_mode.is_explicit()
    }

    pub fn sample_rate_configured(&self) -> bool {
        self.sample_rate.is_explicit()
    }

    /// Whether local sampling settings take precedence over the collector's policy
    pub fn configured(&self) -> bool {
        self.tracing_mode_configured() || self.sample_rate_configured()
    }
}
