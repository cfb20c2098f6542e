// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Service keys have the form `<api token>:<service name>`.

use lazy_static::lazy_static;
use regex::Regex;

const SEPARATOR: char = ':';
const MAX_SERVICE_NAME_LENGTH: usize = 255;
const MASK_HEAD: usize = 4;
const MASK_TAIL: usize = 4;

lazy_static! {
    static ref TOKEN: Regex =
        Regex::new("^[0-9a-fA-F]{64}$").expect("failed creating regex");
    static ref INVALID_NAME_CHARS: Regex =
        Regex::new("[^a-z0-9.:_-]").expect("failed creating regex");
}

/// Normalizes the service name part of a key: lower case, spaces replaced by dashes, and any
/// other unsupported character removed. Keys without a separator are returned trimmed.
pub fn normalize_service_key(key: &str) -> String {
    let key = key.trim();
    let Some((token, name)) = key.split_once(SEPARATOR) else {
        return key.to_string();
    };
    let name = name.to_lowercase().replace(' ', "-");
    let name = INVALID_NAME_CHARS.replace_all(&name, "");
    format!("{token}{SEPARATOR}{name}")
}

/// Checks that a key has a 64 hex digits token and a non empty service name of at most 255
/// characters
pub fn is_valid_service_key(key: &str) -> bool {
    let Some((token, name)) = key.split_once(SEPARATOR) else {
        return false;
    };
    TOKEN.is_match(token) && !name.is_empty() && name.chars().count() <= MAX_SERVICE_NAME_LENGTH
}

/// Hides the middle of the token, keeping the service name readable
pub fn mask_service_key(key: &str) -> String {
    let Some((token, name)) = key.split_once(SEPARATOR) else {
        return key.to_string();
    };
    let len = token.chars().count();
    if len < MASK_HEAD + MASK_TAIL {
        return key.to_string();
    }
    let masked: String = token
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i < MASK_HEAD || i >= len - MASK_TAIL {
                c
            } else {
                '*'
            }
        })
        .collect();
    format!("{masked}{SEPARATOR}{name}")
}
