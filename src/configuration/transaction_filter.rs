// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-transaction tracing overrides.
//!
//! Filters are declared as [`TransactionFilterSpec`], the shape used in the configuration file,
//! and compiled into [`TransactionFilter`] before use. Compilation rejects the whole list on the
//! first invalid entry.

use std::{fmt::Display, str::FromStr, sync::Arc};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::configuration::ConfigurationValueProvider;
use super::sampling::TracingMode;
use crate::error::FilterError;

const URL_FILTER_TYPE: &str = "url";

/// A transaction filter as written in the configuration file
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilterSpec {
    #[serde(rename = "Type", default)]
    pub filter_type: String,
    #[serde(rename = "RegEx", default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(rename = "Extensions", default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    #[serde(rename = "Tracing", default)]
    pub tracing: String,
}

impl TransactionFilterSpec {
    /// A url filter matching a regular expression
    pub fn url_regex(pattern: impl Into<String>, tracing: TracingMode) -> Self {
        TransactionFilterSpec {
            filter_type: URL_FILTER_TYPE.to_string(),
            regex: Some(pattern.into()),
            extensions: Vec::new(),
            tracing: tracing.to_string(),
        }
    }

    /// A url filter matching a list of path suffixes
    pub fn url_extensions<I, S>(extensions: I, tracing: TracingMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TransactionFilterSpec {
            filter_type: URL_FILTER_TYPE.to_string(),
            regex: None,
            extensions: extensions.into_iter().map(Into::into).collect(),
            tracing: tracing.to_string(),
        }
    }

    fn pattern(&self) -> Option<&str> {
        self.regex.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    Extensions(Vec<String>),
}

/// A validated transaction filter, ready to be evaluated
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TransactionFilterSpec")]
pub struct TransactionFilter {
    matcher: Matcher,
    tracing: TracingMode,
}

impl TransactionFilter {
    pub fn compile(spec: &TransactionFilterSpec) -> Result<Self, FilterError> {
        let pattern = spec.pattern();
        if pattern.is_some() && !spec.extensions.is_empty() {
            return Err(FilterError::InvalidRegexExtensions);
        }
        if spec.filter_type != URL_FILTER_TYPE {
            return Err(FilterError::InvalidType(spec.filter_type.clone()));
        }
        let tracing = TracingMode::from_canonical(&spec.tracing)
            .ok_or_else(|| FilterError::InvalidTracingMode(spec.tracing.clone()))?;

        let matcher = match pattern {
            Some(pattern) => Matcher::Regex(Regex::new(pattern).map_err(|e| {
                FilterError::InvalidRegex {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }
            })?),
            // Without extensions this matches nothing
            None => Matcher::Extensions(spec.extensions.clone()),
        };
        Ok(TransactionFilter { matcher, tracing })
    }

    pub fn matches(&self, url: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(url),
            Matcher::Extensions(extensions) => {
                let path = strip_query(url);
                extensions
                    .iter()
                    .any(|ext| !ext.is_empty() && path.ends_with(ext.as_str()))
            }
        }
    }

    pub fn tracing_mode(&self) -> TracingMode {
        self.tracing
    }
}

impl TryFrom<TransactionFilterSpec> for TransactionFilter {
    type Error = FilterError;

    fn try_from(spec: TransactionFilterSpec) -> Result<Self, Self::Error> {
        TransactionFilter::compile(&spec)
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Compiles every spec, failing on the first invalid one
pub fn compile_filters(specs: &[TransactionFilterSpec]) -> Result<TransactionFilters, FilterError> {
    specs
        .iter()
        .map(TransactionFilter::compile)
        .collect::<Result<Vec<_>, _>>()
        .map(|filters| TransactionFilters(filters.into()))
}

/// Ordered list of compiled filters. The first matching filter decides.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilters(Arc<[TransactionFilter]>);

impl TransactionFilters {
    pub fn tracing_mode_for(&self, url: &str) -> Option<TracingMode> {
        self.0
            .iter()
            .find(|filter| filter.matches(url))
            .map(TransactionFilter::tracing_mode)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransactionFilter> {
        self.0.iter()
    }
}

/// The raw filter list held by the configuration, decoded from a YAML or JSON document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TransactionSettings(pub(crate) Vec<TransactionFilterSpec>);

impl FromStr for TransactionSettings {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s).map(TransactionSettings)
    }
}

impl Display for TransactionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "[]"),
        }
    }
}

impl ConfigurationValueProvider for TransactionSettings {
    fn get_configuration_value(&self) -> String {
        self.to_string()
    }
}
