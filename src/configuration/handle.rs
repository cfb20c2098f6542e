// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex, OnceLock};

use arc_swap::ArcSwap;

use super::configuration::Config;
use super::options::ConfigOption;
use super::sampling::TracingMode;
use super::sources::{ConfigurationSource, EnvSource};
use crate::ao_warn;

/// Holds the current configuration, and rebuilds it on demand.
///
/// Readers get a snapshot with [`ConfigHandle::current`], which never blocks. A reload resolves a
/// complete new configuration before publishing it, readers see either the old or the new one.
pub struct ConfigHandle {
    current: ArcSwap<Config>,
    env: Box<dyn ConfigurationSource + Send + Sync>,
    options: Vec<ConfigOption>,
    reload_lock: Mutex<()>,
}

impl ConfigHandle {
    /// Resolves the configuration from the process environment
    pub fn new(options: Vec<ConfigOption>) -> Self {
        Self::with_source(EnvSource, options)
    }

    /// Resolves the configuration from `env` instead of the process environment
    pub fn with_source<S>(env: S, options: Vec<ConfigOption>) -> Self
    where
        S: ConfigurationSource + Send + Sync + 'static,
    {
        let env: Box<dyn ConfigurationSource + Send + Sync> = Box::new(env);
        let config = Config::resolve(&*env, &options);
        ConfigHandle {
            current: ArcSwap::from_pointee(config),
            env,
            options,
            reload_lock: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Resolves the configuration again, keeping the options given at construction, and
    /// publishes it
    pub fn reload(&self) -> Arc<Config> {
        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let config = Arc::new(Config::resolve(&*self.env, &self.options));
        self.current.store(config.clone());
        config
    }
}

impl std::fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigHandle")
            .field("current", &self.current.load_full())
            .field("options", &self.options.len())
            .finish()
    }
}

static GLOBAL: OnceLock<ConfigHandle> = OnceLock::new();

/// Initializes the process-wide configuration with `options`.
///
/// Only the first call has an effect, later calls return the existing handle.
pub fn init(options: Vec<ConfigOption>) -> &'static ConfigHandle {
    let mut initialized = false;
    let handle = GLOBAL.get_or_init(|| {
        initialized = true;
        let handle = ConfigHandle::new(options);
        crate::log::set_max_level(handle.current().debug_level());
        handle
    });
    if !initialized {
        ao_warn!("Configuration: already initialized, ignoring the new options");
    }
    handle
}

/// The process-wide configuration handle, initialized without options on first use
pub fn global() -> &'static ConfigHandle {
    GLOBAL.get_or_init(|| {
        let handle = ConfigHandle::new(Vec::new());
        crate::log::set_max_level(handle.current().debug_level());
        handle
    })
}

/// Rebuilds and publishes the process-wide configuration
pub fn reload() -> Arc<Config> {
    let config = global().reload();
    crate::log::set_max_level(config.debug_level());
    config
}

/// Snapshot of the process-wide configuration
pub fn current() -> Arc<Config> {
    global().current()
}

pub fn collector() -> String {
    current().collector().to_string()
}

pub fn collector_udp() -> String {
    current().collector_udp().to_string()
}

pub fn service_key() -> String {
    current().service_key().to_string()
}

pub fn host_alias() -> String {
    current().host_alias().to_string()
}

pub fn skip_verify() -> bool {
    current().skip_verify()
}

pub fn trusted_path() -> String {
    current().trusted_path().to_string()
}

pub fn tracing_mode() -> TracingMode {
    current().tracing_mode()
}

pub fn sample_rate() -> u32 {
    current().sample_rate()
}

pub fn disabled() -> bool {
    current().disabled()
}

/// Whether the local sampling settings take precedence over the collector's
pub fn sampling_configured() -> bool {
    current().sampling_configured()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ConfigHandle;
    use crate::configuration::options::{with_collector, with_host_alias};
    use crate::configuration::sources::{
        ConfigSourceOrigin, ConfigurationSource, HashMapSource,
    };
    use crate::configuration::supported_configurations::SupportedConfigurations;

    #[test]
    fn test_handle_applies_options_over_env() {
        let env = HashMapSource::from_iter(
            [
                ("APPOPTICS_COLLECTOR", "env.example.com:443"),
                ("APPOPTICS_HOSTNAME_ALIAS", "env-alias"),
            ],
            ConfigSourceOrigin::EnvVar,
        );
        let handle = ConfigHandle::with_source(env, vec![with_collector("code.example.com:443")]);

        let config = handle.current();
        assert_eq!(config.collector(), "code.example.com:443");
        assert_eq!(config.host_alias(), "env-alias");
    }

    /// An environment that can be changed between two reloads
    struct SharedEnv(Arc<std::sync::Mutex<HashMapSource>>);

    impl ConfigurationSource for SharedEnv {
        fn origin(&self) -> ConfigSourceOrigin {
            ConfigSourceOrigin::EnvVar
        }

        fn lookup(&self, key: SupportedConfigurations) -> Option<String> {
            self.0.lock().unwrap().lookup(key)
        }
    }

    #[test]
    fn test_reload_publishes_new_snapshot() {
        let env = Arc::new(std::sync::Mutex::new(HashMapSource::from_iter(
            [("APPOPTICS_COLLECTOR", "first.example.com:443")],
            ConfigSourceOrigin::EnvVar,
        )));
        let handle = ConfigHandle::with_source(
            SharedEnv(env.clone()),
            vec![with_host_alias("alias")],
        );
        let before = handle.current();

        *env.lock().unwrap() = HashMapSource::from_iter(
            [
                ("APPOPTICS_COLLECTOR", "second.example.com:443"),
                ("APPOPTICS_TRACING_MODE", "always"),
            ],
            ConfigSourceOrigin::EnvVar,
        );
        let reloaded = handle.reload();

        assert_eq!(before.collector(), "first.example.com:443");
        assert!(!before.sampling_configured());
        assert_eq!(reloaded.collector(), "second.example.com:443");
        assert!(reloaded.sampling_configured());
        assert_eq!(reloaded.host_alias(), "alias");
        assert!(Arc::ptr_eq(&reloaded, &handle.current()));
    }

    #[test]
    fn test_concurrent_readers() {
        let handle = Arc::new(ConfigHandle::with_source(
            HashMapSource::from_iter(
                [("APPOPTICS_SAMPLE_RATE", "100")],
                ConfigSourceOrigin::EnvVar,
            ),
            Vec::new(),
        ));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(handle.current().sample_rate(), 100);
                    }
                })
            })
            .collect();
        for _ in 0..10 {
            handle.reload();
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
