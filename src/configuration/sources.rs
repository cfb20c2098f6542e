// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{
    borrow::Cow,
    collections::HashMap,
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde_yaml::Value;

use crate::configuration::supported_configurations::SupportedConfigurations;
use crate::error::FileError;

/// Source of a configuration value, from the lowest to the highest precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSourceOrigin {
    Default,
    File,
    EnvVar,
    Code,
}

#[derive(Debug, PartialEq)]
pub(crate) struct ConfigKey<T> {
    pub(crate) value: T,
    pub(crate) origin: ConfigSourceOrigin,
}

/// Compose multiple sources of configuration together.
///
/// The higher precedence sources are the first ones in the list.
pub(crate) struct CompositeSource<'a> {
    sources: Vec<Box<dyn ConfigurationSource + 'a>>,
}

impl<'a> CompositeSource<'a> {
    pub fn add_source<C: ConfigurationSource + 'a>(&mut self, source: C) {
        self.sources.push(Box::new(source));
    }

    pub fn new() -> Self {
        CompositeSource {
            sources: Vec::new(),
        }
    }

    /// Environment first, then the configuration file it points to, if any.
    ///
    /// A configuration file that cannot be loaded is logged and skipped, the remaining layers
    /// are still used.
    pub fn with_env(env: &'a dyn ConfigurationSource) -> Self {
        let mut sources = Self::new();
        sources.add_source(env);

        if let Ok(path) = env.get(SupportedConfigurations::ConfigFile) {
            match FileSource::load(&path) {
                Ok(file) => sources.add_source(file),
                Err(e) => crate::ao_warn!("Configuration: ignoring config file - {e}"),
            }
        }
        sources
    }

    pub fn default_sources() -> CompositeSource<'static> {
        CompositeSource::with_env(&EnvSource)
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct CompositeParseError {
    desired_type: &'static str,
    error: Cow<'static, str>,
    value: String,
    origin: ConfigSourceOrigin,
}

impl Display for CompositeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ignoring {:?} value {:?}, expected {}: {}",
            self.origin, self.value, self.desired_type, self.error
        )
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct CompositeConfigSourceResult<T> {
    pub name: SupportedConfigurations,
    pub value: Option<ConfigKey<T>>,
    pub errors: Vec<CompositeParseError>,
}

impl CompositeSource<'_> {
    pub fn get(&self, key: SupportedConfigurations) -> CompositeConfigSourceResult<String> {
        self.get_parse(key)
    }

    /// Get a value from the configuration sources
    ///
    /// This method will iterate over sources in order of precedence
    /// and return the first valid value found. If no value is found, it will return None.
    ///
    /// It will return all parsing errors encountered before finding a valid value, and associate
    /// them with the source they came from.
    pub fn get_parse<T: FromStr<Err = impl Display>>(
        &self,
        name: SupportedConfigurations,
    ) -> CompositeConfigSourceResult<T> {
        let mut errors = Vec::new();
        for s in &self.sources {
            match s.get(name).and_then(|value| {
                value
                    .parse::<T>()
                    .map_err(|e| ConfigSourceError::FailedParsing {
                        desired_type: std::any::type_name::<T>(),
                        error: Cow::Owned(e.to_string()),
                        value,
                    })
            }) {
                Ok(v) => {
                    return CompositeConfigSourceResult {
                        name,
                        value: Some(ConfigKey {
                            value: v,
                            origin: s.origin(),
                        }),
                        errors,
                    };
                }
                Err(ConfigSourceError::Missing) => continue,
                Err(ConfigSourceError::FailedParsing {
                    error,
                    value,
                    desired_type,
                }) => {
                    errors.push(CompositeParseError {
                        desired_type,
                        error,
                        value,
                        origin: s.origin(),
                    });
                }
            }
        }
        CompositeConfigSourceResult {
            name,
            value: None,
            errors,
        }
    }
}

pub(crate) enum ConfigSourceError {
    Missing,
    FailedParsing {
        desired_type: &'static str,
        error: Cow<'static, str>,
        // String representation of the value we failed to parse
        value: String,
    },
}

type ConfigSourceResult<T> = Result<T, ConfigSourceError>;

/// Represent a source of configuration
pub trait ConfigurationSource {
    fn origin(&self) -> ConfigSourceOrigin;

    fn lookup(&self, key: SupportedConfigurations) -> Option<String>;
}

impl dyn ConfigurationSource + '_ {
    fn get(&self, key: SupportedConfigurations) -> ConfigSourceResult<String> {
        self.lookup(key).ok_or(ConfigSourceError::Missing)
    }
}

impl<S: ConfigurationSource + ?Sized> ConfigurationSource for &S {
    fn origin(&self) -> ConfigSourceOrigin {
        (**self).origin()
    }

    fn lookup(&self, key: SupportedConfigurations) -> Option<String> {
        (**self).lookup(key)
    }
}

/// Reads the process environment. Unset and empty variables are both treated as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl ConfigurationSource for EnvSource {
    fn origin(&self) -> ConfigSourceOrigin {
        ConfigSourceOrigin::EnvVar
    }

    fn lookup(&self, key: SupportedConfigurations) -> Option<String> {
        key.env_vars()
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.is_empty())
    }
}

/// Values read from a YAML configuration file, flattened to their dotted field path
#[derive(Debug, Default, Clone)]
pub(crate) struct FileSource {
    values: HashMap<String, String>,
}

impl FileSource {
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if !supported {
            return Err(FileError::UnsupportedFormat(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| FileError::Parse {
            path: PathBuf::from(path),
            source,
        })
    }

    pub(crate) fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        let root: Value = serde_yaml::from_str(contents)?;
        let mut values = HashMap::new();
        match root {
            Value::Mapping(_) => flatten(&root, String::new(), &mut values)?,
            // An empty document configures nothing
            Value::Null => {}
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a mapping at the document root, found {}",
                    type_name(&other)
                )))
            }
        }
        Ok(FileSource { values })
    }
}

fn flatten(
    node: &Value,
    path: String,
    out: &mut HashMap<String, String>,
) -> Result<(), serde_yaml::Error> {
    match node {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let Some(key) = key.as_str() else {
                    continue;
                };
                let child_path = if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{path}.{key}")
                };
                flatten(child, child_path, out)?;
            }
        }
        Value::Null => {}
        Value::Bool(b) => {
            out.insert(path, b.to_string());
        }
        Value::Number(n) => {
            out.insert(path, n.to_string());
        }
        Value::String(s) => {
            out.insert(path, s.clone());
        }
        // Structured values are handed over as a document and decoded by the field they belong to
        Value::Sequence(_) => {
            out.insert(path, serde_yaml::to_string(node)?);
        }
        Value::Tagged(tagged) => flatten(&tagged.value, path, out)?,
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

impl ConfigurationSource for FileSource {
    fn origin(&self) -> ConfigSourceOrigin {
        ConfigSourceOrigin::File
    }

    fn lookup(&self, key: SupportedConfigurations) -> Option<String> {
        if !key.in_file() {
            return None;
        }
        self.values.get(key.as_str()).cloned()
    }
}

/// A source of configuration that is backed by a HashMap
///
/// Keys are environment variable names. This is mostly useful to resolve a configuration from a
/// snapshot of the environment instead of the live process environment.
#[derive(Debug, Clone)]
pub struct HashMapSource {
    map: HashMap<String, String>,
    origin: ConfigSourceOrigin,
}

impl HashMapSource {
    pub fn from_iter<U: ToString, V: ToString, T: IntoIterator<Item = (U, V)>>(
        map: T,
        origin: ConfigSourceOrigin,
    ) -> Self {
        HashMapSource {
            map: map
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            origin,
        }
    }
}

impl ConfigurationSource for HashMapSource {
    fn origin(&self) -> ConfigSourceOrigin {
        self.origin
    }

    fn lookup(&self, key: SupportedConfigurations) -> Option<String> {
        key.env_vars()
            .iter()
            .filter_map(|name| self.map.get(*name))
            .find(|value| !value.is_empty())
            .cloned()
    }
}
