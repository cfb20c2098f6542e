// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{io, path::PathBuf};

use thiserror::Error;

/// Reasons a transaction filter specification is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid transaction filter type: {0:?}, only \"url\" is supported")]
    InvalidType(String),
    #[error("invalid transaction filter: RegEx and Extensions cannot be set together")]
    InvalidRegexExtensions,
    #[error("invalid transaction filter tracing mode: {0:?}, should be enabled or disabled")]
    InvalidTracingMode(String),
    #[error("invalid transaction filter RegEx {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },
}

/// Failures while loading the configuration file layer
#[derive(Error, Debug)]
pub enum FileError {
    #[error("unsupported format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
