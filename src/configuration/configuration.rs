// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, convert::Infallible, fmt::Display, str::FromStr};

use crate::configuration::delta::Delta;
use crate::configuration::options::ConfigOption;
use crate::configuration::sampling::{SamplingConfig, TracingMode};
use crate::configuration::service_key::{mask_service_key, normalize_service_key};
use crate::configuration::sources::{
    CompositeConfigSourceResult, CompositeSource, ConfigKey, ConfigSourceOrigin,
    ConfigurationSource,
};
use crate::configuration::supported_configurations::SupportedConfigurations;
use crate::configuration::transaction_filter::{
    compile_filters, TransactionFilterSpec, TransactionFilters, TransactionSettings,
};
use crate::configuration::validation::{self, discard, Discarded};
use crate::log::LevelFilter;
use crate::{ao_info, ao_warn};

pub const DEFAULT_SSL_COLLECTOR: &str = "collector.appoptics.com:443";
/// Used by the udp reporter when no udp collector is configured
pub const DEFAULT_UDP_COLLECTOR: &str = "127.0.0.1:7831";
pub const DEFAULT_PRECISION: u32 = 2;

/// Transport used to send events to the collector
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReporterType {
    #[default]
    Ssl,
    Udp,
}

impl FromStr for ReporterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ssl") {
            Ok(ReporterType::Ssl)
        } else if s.eq_ignore_ascii_case("udp") {
            Ok(ReporterType::Udp)
        } else {
            Err(format!("reporter type should be one of ssl, udp, found {s:?}"))
        }
    }
}

impl Display for ReporterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reporter = match self {
            ReporterType::Ssl => "ssl",
            ReporterType::Udp => "udp",
        };
        write!(f, "{reporter}")
    }
}

/// Current value of a configuration field, rendered as a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationEntry {
    pub name: SupportedConfigurations,
    pub value: String,
    pub origin: ConfigSourceOrigin,
}

/// Exposes the current state of a configuration item, for reporting
pub(crate) trait ConfigurationProvider {
    fn get_configuration(&self) -> ConfigurationEntry;
}

/// A trait for converting configuration values to their string representation.
///
/// The representation is used by the startup delta report, two values rendering to the same
/// string are considered equal.
pub(crate) trait ConfigurationValueProvider {
    fn get_configuration_value(&self) -> String;
}

/// A trait for updating configuration values while tracking their origin source.
pub(crate) trait ValueSourceUpdater<T> {
    fn name(&self) -> SupportedConfigurations;
    /// Updates the configuration value while recording its source origin.
    fn set_value_source(&mut self, value: T, source: ConfigSourceOrigin);
}

/// Configuration item that tracks the value of a setting and where it came from
/// This allows us to manage configuration precedence
#[derive(Debug, Clone)]
pub(crate) struct ConfigItem<T: ConfigurationValueProvider> {
    name: SupportedConfigurations,
    default_value: T,
    file_value: Option<T>,
    env_value: Option<T>,
    code_value: Option<T>,
}

impl<T: Clone + ConfigurationValueProvider> ConfigItem<T> {
    /// Creates a new ConfigItem with a default value
    pub(crate) fn new(name: SupportedConfigurations, default: T) -> Self {
        Self {
            name,
            default_value: default,
            file_value: None,
            env_value: None,
            code_value: None,
        }
    }

    /// Sets the code value (convenience method)
    pub(crate) fn set_code(&mut self, value: T) {
        self.code_value = Some(value);
    }

    /// Gets the current value based on priority:
    /// code > env_var > file > default
    pub(crate) fn value(&self) -> &T {
        self.code_value
            .as_ref()
            .or(self.env_value.as_ref())
            .or(self.file_value.as_ref())
            .unwrap_or(&self.default_value)
    }

    /// Gets the source of the current value
    pub(crate) fn source(&self) -> ConfigSourceOrigin {
        if self.code_value.is_some() {
            ConfigSourceOrigin::Code
        } else if self.env_value.is_some() {
            ConfigSourceOrigin::EnvVar
        } else if self.file_value.is_some() {
            ConfigSourceOrigin::File
        } else {
            ConfigSourceOrigin::Default
        }
    }

    /// Whether a source other than the defaults supplied the current value
    pub(crate) fn is_explicit(&self) -> bool {
        self.source() != ConfigSourceOrigin::Default
    }

    /// Drops every layer, going back to the default value
    pub(crate) fn reset(&mut self) {
        self.file_value = None;
        self.env_value = None;
        self.code_value = None;
    }

    /// Resets the item to its default when `check` rejects the current value
    #[track_caller]
    pub(crate) fn validate_with(
        &mut self,
        check: impl FnOnce(&T) -> Result<(), String>,
    ) -> Option<Discarded> {
        let reason = check(self.value()).err()?;
        self.reset();
        Some(discard(self.name, reason))
    }
}

impl<T: Clone + Default> ConfigItem<Token<T>>
where
    Token<T>: ConfigurationValueProvider,
{
    /// The current value if it was recognized, the default one otherwise
    pub(crate) fn known_value(&self) -> T {
        self.value()
            .known()
            .or(self.default_value.known())
            .cloned()
            .unwrap_or_default()
    }

    /// Resets an unrecognized token to the default
    #[track_caller]
    pub(crate) fn validate_token(&mut self) -> Option<Discarded> {
        self.validate_with(|token| match token {
            Token::Known(_) => Ok(()),
            Token::Unknown { reason, .. } => Err(reason.clone()),
        })
    }
}

impl<T: Clone + ConfigurationValueProvider> ConfigurationProvider for ConfigItem<T> {
    fn get_configuration(&self) -> ConfigurationEntry {
        ConfigurationEntry {
            name: self.name,
            value: self.value().get_configuration_value(),
            origin: self.source(),
        }
    }
}

impl<T: ConfigurationValueProvider> ValueSourceUpdater<T> for ConfigItem<T> {
    fn name(&self) -> SupportedConfigurations {
        self.name
    }

    /// Sets a value from a specific source
    fn set_value_source(&mut self, value: T, source: ConfigSourceOrigin) {
        match source {
            ConfigSourceOrigin::Code => self.code_value = Some(value),
            ConfigSourceOrigin::EnvVar => self.env_value = Some(value),
            ConfigSourceOrigin::File => self.file_value = Some(value),
            ConfigSourceOrigin::Default => {
                ao_warn!("Cannot set default value after initialization");
            }
        }
    }
}

struct ConfigItemSourceUpdater<'a> {
    sources: &'a CompositeSource<'a>,
}

impl ConfigItemSourceUpdater<'_> {
    fn log_errors<T>(result: &CompositeConfigSourceResult<T>) {
        for error in &result.errors {
            ao_warn!("Configuration: {} - {error}", result.name.as_str());
        }
    }

    fn apply_result<ParsedConfig, RawConfig, ConfigItemType, F>(
        &self,
        mut item: ConfigItemType,
        result: CompositeConfigSourceResult<RawConfig>,
        transform: F,
    ) -> ConfigItemType
    where
        ParsedConfig: Clone + ConfigurationValueProvider,
        ConfigItemType: ValueSourceUpdater<ParsedConfig>,
        F: FnOnce(RawConfig) -> ParsedConfig,
    {
        Self::log_errors(&result);

        if let Some(ConfigKey { value, origin }) = result.value {
            item.set_value_source(transform(value), origin);
        }
        item
    }

    /// Highest precedence value of a field that parses, logging the ones that don't
    fn parsed<T>(&self, name: SupportedConfigurations) -> Option<ConfigKey<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let result = self.sources.get_parse::<T>(name);
        Self::log_errors(&result);
        result.value
    }

    /// Updates a ConfigItem from sources with parsed value (no transformation)
    fn update_parsed<ParsedConfig, ConfigItemType>(&self, default: ConfigItemType) -> ConfigItemType
    where
        ParsedConfig: Clone + FromStr + ConfigurationValueProvider,
        ParsedConfig::Err: Display,
        ConfigItemType: ValueSourceUpdater<ParsedConfig>,
    {
        let result = self.sources.get_parse::<ParsedConfig>(default.name());
        self.apply_result(default, result, |value| value)
    }

    /// Updates a ConfigItem from sources string with transformation
    fn update_string<ParsedConfig, ConfigItemType, F>(
        &self,
        default: ConfigItemType,
        transform: F,
    ) -> ConfigItemType
    where
        ParsedConfig: Clone + ConfigurationValueProvider,
        ConfigItemType: ValueSourceUpdater<ParsedConfig>,
        F: FnOnce(String) -> ParsedConfig,
    {
        let result = self.sources.get(default.name());
        self.apply_result(default, result, transform)
    }

    /// Updates a ConfigItem from sources with parsed value and transformation
    fn update_parsed_with_transform<ParsedConfig, RawConfig, ConfigItemType, F>(
        &self,
        default: ConfigItemType,
        transform: F,
    ) -> ConfigItemType
    where
        ParsedConfig: Clone + ConfigurationValueProvider,
        RawConfig: FromStr,
        RawConfig::Err: Display,
        ConfigItemType: ValueSourceUpdater<ParsedConfig>,
        F: FnOnce(RawConfig) -> ParsedConfig,
    {
        let result = self.sources.get_parse::<RawConfig>(default.name());
        self.apply_result(default, result, transform)
    }
}

/// Macro to implement ConfigurationValueProvider trait for types that implement Display
macro_rules! impl_config_value_provider {
  ($($type:ty),* $(,)?) => {
      $(
          impl ConfigurationValueProvider for $type {
              fn get_configuration_value(&self) -> String {
                  self.to_string()
              }
          }
      )*
  };
}

impl_config_value_provider!(
    Cow<'static, str>,
    String,
    bool,
    u32,
    u64,
    i64,
);

/// Wrapper to parse booleans, `true` or `false` in any case
struct Flag(bool);

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Flag(true)),
            "false" => Ok(Flag(false)),
            _ => Err(format!("expected true or false, found {s:?}")),
        }
    }
}

/// An enumerated value as found in a source.
///
/// Parsing never fails, so the highest precedence source always wins. An unrecognized value is
/// kept as is until validation resets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<T> {
    Known(T),
    Unknown { raw: String, reason: String },
}

impl<T> Token<T> {
    pub(crate) fn known(&self) -> Option<&T> {
        match self {
            Token::Known(value) => Some(value),
            Token::Unknown { .. } => None,
        }
    }
}

impl<T: Default> Default for Token<T> {
    fn default() -> Self {
        Token::Known(T::default())
    }
}

impl<T> FromStr for Token<T>
where
    T: FromStr,
    T::Err: Display,
{
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<T>() {
            Ok(value) => Token::Known(value),
            Err(e) => Token::Unknown {
                raw: s.to_string(),
                reason: e.to_string(),
            },
        })
    }
}

impl<T: Display> ConfigurationValueProvider for Token<T> {
    fn get_configuration_value(&self) -> String {
        match self {
            Token::Known(value) => value.to_string(),
            Token::Unknown { raw, .. } => raw.clone(),
        }
    }
}

/// Tuning knobs of the reporter
#[derive(Debug, Clone)]
pub struct ReporterOptions {
    event_flush_interval: ConfigItem<u64>,
    event_flush_batch_size: ConfigItem<u64>,
    metric_flush_interval: ConfigItem<u64>,
    get_settings_interval: ConfigItem<u64>,
    settings_timeout_interval: ConfigItem<u64>,
    ping_interval: ConfigItem<u64>,
    retry_delay_initial: ConfigItem<u64>,
    retry_delay_max: ConfigItem<u64>,
    redirect_max: ConfigItem<u64>,
    retry_log_threshold: ConfigItem<u64>,
    max_retries: ConfigItem<u64>,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        use SupportedConfigurations::*;
        ReporterOptions {
            event_flush_interval: ConfigItem::new(EventFlushInterval, 2),
            event_flush_batch_size: ConfigItem::new(EventFlushBatchSize, 2000),
            metric_flush_interval: ConfigItem::new(MetricFlushInterval, 30),
            get_settings_interval: ConfigItem::new(GetSettingsInterval, 30),
            settings_timeout_interval: ConfigItem::new(SettingsTimeoutInterval, 10),
            ping_interval: ConfigItem::new(PingInterval, 20),
            retry_delay_initial: ConfigItem::new(RetryDelayInitial, 500),
            retry_delay_max: ConfigItem::new(RetryDelayMax, 60),
            redirect_max: ConfigItem::new(RedirectMax, 20),
            retry_log_threshold: ConfigItem::new(RetryLogThreshold, 10),
            max_retries: ConfigItem::new(MaxRetries, 20),
        }
    }
}

impl ReporterOptions {
    fn from_sources(cisu: &ConfigItemSourceUpdater<'_>) -> Self {
        let default = ReporterOptions::default();
        ReporterOptions {
            event_flush_interval: cisu.update_parsed(default.event_flush_interval),
            event_flush_batch_size: cisu.update_parsed(default.event_flush_batch_size),
            metric_flush_interval: cisu.update_parsed(default.metric_flush_interval),
            get_settings_interval: cisu.update_parsed(default.get_settings_interval),
            settings_timeout_interval: cisu.update_parsed(default.settings_timeout_interval),
            ping_interval: cisu.update_parsed(default.ping_interval),
            retry_delay_initial: cisu.update_parsed(default.retry_delay_initial),
            retry_delay_max: cisu.update_parsed(default.retry_delay_max),
            redirect_max: cisu.update_parsed(default.redirect_max),
            retry_log_threshold: cisu.update_parsed(default.retry_log_threshold),
            max_retries: cisu.update_parsed(default.max_retries),
        }
    }

    fn entries(&self) -> [&dyn ConfigurationProvider; 11] {
        [
            &self.event_flush_interval,
            &self.event_flush_batch_size,
            &self.metric_flush_interval,
            &self.get_settings_interval,
            &self.settings_timeout_interval,
            &self.ping_interval,
            &self.retry_delay_initial,
            &self.retry_delay_max,
            &self.redirect_max,
            &self.retry_log_threshold,
            &self.max_retries,
        ]
    }

    /// Seconds between two event flushes
    pub fn event_flush_interval(&self) -> u64 {
        *self.event_flush_interval.value()
    }

    /// Maximum number of events sent in one batch
    pub fn event_flush_batch_size(&self) -> u64 {
        *self.event_flush_batch_size.value()
    }

    /// Seconds between two metrics flushes
    pub fn metric_flush_interval(&self) -> u64 {
        *self.metric_flush_interval.value()
    }

    /// Seconds between two settings requests
    pub fn get_settings_interval(&self) -> u64 {
        *self.get_settings_interval.value()
    }

    /// Seconds after which settings obtained from the collector expire
    pub fn settings_timeout_interval(&self) -> u64 {
        *self.settings_timeout_interval.value()
    }

    /// Seconds between two keep-alive pings
    pub fn ping_interval(&self) -> u64 {
        *self.ping_interval.value()
    }

    /// Milliseconds
    pub fn retry_delay_initial(&self) -> u64 {
        *self.retry_delay_initial.value()
    }

    /// Seconds
    pub fn retry_delay_max(&self) -> u64 {
        *self.retry_delay_max.value()
    }

    pub fn redirect_max(&self) -> u64 {
        *self.redirect_max.value()
    }

    /// Number of retries after which failures start being logged
    pub fn retry_log_threshold(&self) -> u64 {
        *self.retry_log_threshold.value()
    }

    pub fn max_retries(&self) -> u64 {
        *self.max_retries.value()
    }
}

/// Resolved agent configuration
///
/// Use [`Config::builder`] to resolve the configuration from the environment and the
/// configuration file it points to, and to override values from code.
///
/// # Precedence
///
/// For every field, the first source providing a value is used:
///
/// code > environment variables > configuration file > defaults
#[derive(Clone)]
pub struct Config {
    collector: ConfigItem<Cow<'static, str>>,
    service_key: ConfigItem<String>,
    trusted_path: ConfigItem<String>,
    collector_udp: ConfigItem<String>,
    reporter_type: ConfigItem<Token<ReporterType>>,
    sampling: SamplingConfig,
    prepend_domain: ConfigItem<bool>,
    host_alias: ConfigItem<String>,
    skip_verify: ConfigItem<bool>,
    precision: ConfigItem<u32>,
    reporter_properties: ReporterOptions,
    transaction_settings: ConfigItem<TransactionSettings>,
    /// Compiled from `transaction_settings` during validation
    transaction_filters: TransactionFilters,
    disabled: ConfigItem<bool>,
    debug_level: ConfigItem<Token<LevelFilter>>,
    /// Values rejected while building this configuration
    discarded: Vec<Discarded>,
}

impl Config {
    fn from_sources(sources: &CompositeSource) -> Self {
        let default = default_config();
        let cisu = ConfigItemSourceUpdater { sources };

        let sampling = SamplingConfig::merge(
            cisu.parsed(SupportedConfigurations::TracingMode),
            cisu.parsed(SupportedConfigurations::SampleRate),
        );

        Self {
            collector: cisu.update_string(default.collector, Cow::Owned),
            service_key: cisu.update_string(default.service_key, |key| {
                normalize_service_key(&key)
            }),
            trusted_path: cisu.update_string(default.trusted_path, |path| path),
            collector_udp: cisu.update_string(default.collector_udp, |addr| addr),
            reporter_type: cisu.update_parsed(default.reporter_type),
            sampling,
            prepend_domain: cisu
                .update_parsed_with_transform(default.prepend_domain, |Flag(prepend)| prepend),
            host_alias: cisu.update_string(default.host_alias, |alias| alias),
            skip_verify: cisu
                .update_parsed_with_transform(default.skip_verify, |Flag(skip)| skip),
            precision: cisu.update_parsed(default.precision),
            reporter_properties: ReporterOptions::from_sources(&cisu),
            transaction_settings: cisu.update_parsed(default.transaction_settings),
            transaction_filters: default.transaction_filters,
            disabled: cisu
                .update_parsed_with_transform(default.disabled, |Flag(disabled)| disabled),
            debug_level: cisu.update_parsed(default.debug_level),
            discarded: Vec::new(),
        }
    }

    pub(crate) fn builder_with_sources(sources: &CompositeSource) -> ConfigBuilder {
        ConfigBuilder {
            config: Config::from_sources(sources),
        }
    }

    /// Creates a new builder to set overrides detected configuration
    pub fn builder() -> ConfigBuilder {
        Self::builder_with_sources(&CompositeSource::default_sources())
    }

    /// Runs the whole resolution: `env` and the configuration file it points to, then the
    /// `options`, then validation. Values differing from the defaults are logged.
    pub(crate) fn resolve(env: &dyn ConfigurationSource, options: &[ConfigOption]) -> Self {
        let sources = CompositeSource::with_env(env);
        let config = Config::builder_with_sources(&sources)
            .apply(options)
            .build();

        let delta = Delta::between(&default_config(), &config).sanitize();
        if !delta.is_empty() {
            ao_info!("Configuration: non-default values\n{delta}");
        }
        config
    }

    /// Checks every field, resetting the invalid ones to their default.
    ///
    /// Never fails, the returned list holds what was discarded. The transaction filters are
    /// compiled here, and are all dropped if any of them is invalid.
    pub(crate) fn validate(&mut self) -> Vec<Discarded> {
        let mut discarded = Vec::new();

        discarded.extend(
            self.collector
                .validate_with(|collector| validation::check_collector(collector)),
        );
        discarded.extend(
            self.service_key
                .validate_with(|key| validation::check_service_key(key)),
        );
        discarded.extend(self.reporter_type.validate_token());
        discarded.extend(self.sampling.reconcile());
        discarded.extend(
            self.precision
                .validate_with(|precision| validation::check_precision(*precision)),
        );

        match compile_filters(&self.transaction_settings.value().0) {
            Ok(filters) => self.transaction_filters = filters,
            Err(e) => {
                self.transaction_settings.reset();
                self.transaction_filters = TransactionFilters::default();
                discarded.push(discard(
                    SupportedConfigurations::TransactionSettings,
                    e.to_string(),
                ));
            }
        }
        discarded.extend(self.debug_level.validate_token());
        discarded
    }

    /// Values rejected while building this configuration, each one replaced by its default
    pub fn discarded(&self) -> &[Discarded] {
        &self.discarded
    }

    /// Every reported field, in report order
    pub fn entries(&self) -> Vec<ConfigurationEntry> {
        let [tracing_mode, sample_rate] = self.sampling.entries();
        let mut providers: Vec<&dyn ConfigurationProvider> = vec![
            &self.collector as &dyn ConfigurationProvider,
            &self.service_key,
            &self.trusted_path,
            &self.collector_udp,
            &self.reporter_type,
            tracing_mode,
            sample_rate,
            &self.prepend_domain,
            &self.host_alias,
            &self.skip_verify,
            &self.precision,
        ];
        providers.extend(self.reporter_properties.entries());
        providers.extend([
            &self.transaction_settings as &dyn ConfigurationProvider,
            &self.disabled,
            &self.debug_level,
        ]);
        providers
            .into_iter()
            .map(|provider| provider.get_configuration())
            .collect()
    }

    pub fn collector(&self) -> &str {
        self.collector.value()
    }

    pub fn service_key(&self) -> &str {
        self.service_key.value()
    }

    pub fn trusted_path(&self) -> &str {
        self.trusted_path.value()
    }

    pub fn collector_udp(&self) -> &str {
        self.collector_udp.value()
    }

    pub fn reporter_type(&self) -> ReporterType {
        self.reporter_type.known_value()
    }

    /// Address of the collector for the configured reporter type
    pub fn reporter_endpoint(&self) -> &str {
        match self.reporter_type() {
            ReporterType::Ssl => self.collector(),
            ReporterType::Udp if self.collector_udp().is_empty() => DEFAULT_UDP_COLLECTOR,
            ReporterType::Udp => self.collector_udp(),
        }
    }

    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    pub fn tracing_mode(&self) -> TracingMode {
        self.sampling.tracing_mode()
    }

    /// Sample rate in parts per million
    pub fn sample_rate(&self) -> u32 {
        self.sampling.sample_rate()
    }

    /// Whether the local sampling settings take precedence over the collector's
    pub fn sampling_configured(&self) -> bool {
        self.sampling.configured()
    }

    pub fn prepend_domain(&self) -> bool {
        *self.prepend_domain.value()
    }

    pub fn host_alias(&self) -> &str {
        self.host_alias.value()
    }

    pub fn skip_verify(&self) -> bool {
        *self.skip_verify.value()
    }

    /// Number of significant digits of the histograms
    pub fn precision(&self) -> u32 {
        *self.precision.value()
    }

    pub fn reporter_properties(&self) -> &ReporterOptions {
        &self.reporter_properties
    }

    pub fn transaction_filters(&self) -> &TransactionFilters {
        &self.transaction_filters
    }

    /// Tracing mode forced by the first transaction filter matching `url`, if any
    pub fn transaction_tracing_mode(&self, url: &str) -> Option<TracingMode> {
        self.transaction_filters.tracing_mode_for(url)
    }

    pub fn disabled(&self) -> bool {
        *self.disabled.value()
    }

    pub fn debug_level(&self) -> LevelFilter {
        self.debug_level.known_value()
    }
}

impl Default for Config {
    fn default() -> Self {
        default_config()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("collector", &self.collector())
            .field("service_key", &mask_service_key(self.service_key()))
            .field("trusted_path", &self.trusted_path())
            .field("collector_udp", &self.collector_udp())
            .field("reporter_type", &self.reporter_type())
            .field("sampling", &self.sampling)
            .field("prepend_domain", &self.prepend_domain())
            .field("host_alias", &self.host_alias())
            .field("skip_verify", &self.skip_verify())
            .field("precision", &self.precision())
            .field("reporter_properties", &self.reporter_properties)
            .field("transaction_filters", &self.transaction_filters)
            .field("disabled", &self.disabled())
            .field("debug_level", &self.debug_level())
            .finish()
    }
}

fn default_config() -> Config {
    use SupportedConfigurations::*;
    Config {
        collector: ConfigItem::new(Collector, Cow::Borrowed(DEFAULT_SSL_COLLECTOR)),
        service_key: ConfigItem::new(ServiceKey, String::new()),
        trusted_path: ConfigItem::new(TrustedPath, String::new()),
        collector_udp: ConfigItem::new(CollectorUdp, String::new()),
        reporter_type: ConfigItem::new(ReporterType, Token::default()),
        sampling: SamplingConfig::default(),
        prepend_domain: ConfigItem::new(PrependDomain, false),
        host_alias: ConfigItem::new(HostAlias, String::new()),
        skip_verify: ConfigItem::new(SkipVerify, false),
        precision: ConfigItem::new(Precision, DEFAULT_PRECISION),
        reporter_properties: ReporterOptions::default(),
        transaction_settings: ConfigItem::new(
            TransactionSettings,
            self::TransactionSettings::default(),
        ),
        transaction_filters: TransactionFilters::default(),
        disabled: ConfigItem::new(Disabled, false),
        debug_level: ConfigItem::new(DebugLevel, Token::default()),
        discarded: Vec::new(),
    }
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Finalizes the builder and returns the validated configuration.
    ///
    /// Rejected values are logged and listed by [`Config::discarded`].
    pub fn build(&self) -> Config {
        let mut config = self.config.clone();
        config.discarded = config.validate();
        config
    }

    /// Applies the options in order, the last one setting a field wins
    pub fn apply(&mut self, options: &[ConfigOption]) -> &mut Self {
        for option in options {
            option(self);
        }
        self
    }

    /// Address of the collector, as `host:port`
    ///
    /// **Default**: `collector.appoptics.com:443`
    ///
    /// Env variable: `APPOPTICS_COLLECTOR`
    pub fn set_collector(&mut self, collector: String) -> &mut Self {
        self.config.collector.set_code(Cow::Owned(collector));
        self
    }

    /// Service key, as `<api token>:<service name>`. The service name is normalized.
    ///
    /// **Default**: `(none)`
    ///
    /// Env variable: `APPOPTICS_SERVICE_KEY`
    pub fn set_service_key(&mut self, service_key: String) -> &mut Self {
        self.config
            .service_key
            .set_code(normalize_service_key(&service_key));
        self
    }

    /// Path of the certificate used to verify the collector
    ///
    /// **Default**: `(none)`
    ///
    /// Env variable: `APPOPTICS_TRUSTEDPATH`
    pub fn set_trusted_path(&mut self, trusted_path: String) -> &mut Self {
        self.config.trusted_path.set_code(trusted_path);
        self
    }

    /// Address of the udp collector, used by the udp reporter
    ///
    /// **Default**: `127.0.0.1:7831` when the udp reporter is used
    ///
    /// Env variable: `APPOPTICS_COLLECTOR_UDP`
    pub fn set_collector_udp(&mut self, collector_udp: String) -> &mut Self {
        self.config.collector_udp.set_code(collector_udp);
        self
    }

    /// **Default**: `ssl`
    ///
    /// Env variable: `APPOPTICS_REPORTER`
    pub fn set_reporter_type(&mut self, reporter_type: ReporterType) -> &mut Self {
        self.config.reporter_type.set_code(Token::Known(reporter_type));
        self
    }

    /// Setting the tracing mode makes the local sampling settings take precedence over the
    /// collector's
    ///
    /// **Default**: `enabled`
    ///
    /// Env variable: `APPOPTICS_TRACING_MODE`
    pub fn set_tracing_mode(&mut self, tracing_mode: TracingMode) -> &mut Self {
        self.config.sampling.set_tracing_mode(tracing_mode);
        self
    }

    /// Sample rate in parts per million, between 0 and 1000000
    ///
    /// **Default**: `1000000`
    ///
    /// Env variable: `APPOPTICS_SAMPLE_RATE`
    pub fn set_sample_rate(&mut self, sample_rate: i64) -> &mut Self {
        self.config.sampling.set_sample_rate(sample_rate);
        self
    }

    /// **Default**: `false`
    ///
    /// Env variable: `APPOPTICS_PREPEND_DOMAIN`
    pub fn set_prepend_domain(&mut self, prepend_domain: bool) -> &mut Self {
        self.config.prepend_domain.set_code(prepend_domain);
        self
    }

    /// **Default**: `(none)`
    ///
    /// Env variable: `APPOPTICS_HOSTNAME_ALIAS`
    pub fn set_host_alias(&mut self, host_alias: String) -> &mut Self {
        self.config.host_alias.set_code(host_alias);
        self
    }

    /// Disables the verification of the collector's certificate
    ///
    /// **Default**: `false`
    ///
    /// Env variable: `APPOPTICS_INSECURE_SKIP_VERIFY`
    pub fn set_skip_verify(&mut self, skip_verify: bool) -> &mut Self {
        self.config.skip_verify.set_code(skip_verify);
        self
    }

    /// **Default**: `2`
    ///
    /// Env variable: `APPOPTICS_HISTOGRAM_PRECISION`
    pub fn set_precision(&mut self, precision: u32) -> &mut Self {
        self.config.precision.set_code(precision);
        self
    }

    /// **Default**: `2`
    ///
    /// Env variable: `APPOPTICS_EVENTS_FLUSH_INTERVAL`
    pub fn set_event_flush_interval(&mut self, seconds: u64) -> &mut Self {
        self.config
            .reporter_properties
            .event_flush_interval
            .set_code(seconds);
        self
    }

    /// **Default**: `2000`
    ///
    /// Env variable: `APPOPTICS_EVENTS_BATCHSIZE`
    pub fn set_event_flush_batch_size(&mut self, batch_size: u64) -> &mut Self {
        self.config
            .reporter_properties
            .event_flush_batch_size
            .set_code(batch_size);
        self
    }

    /// **Default**: `30`
    ///
    /// Env variable: `APPOPTICS_METRIC_FLUSH_INTERVAL`
    pub fn set_metric_flush_interval(&mut self, seconds: u64) -> &mut Self {
        self.config
            .reporter_properties
            .metric_flush_interval
            .set_code(seconds);
        self
    }

    /// **Default**: `30`
    ///
    /// Env variable: `APPOPTICS_GET_SETTINGS_INTERVAL`
    pub fn set_get_settings_interval(&mut self, seconds: u64) -> &mut Self {
        self.config
            .reporter_properties
            .get_settings_interval
            .set_code(seconds);
        self
    }

    /// **Default**: `10`
    ///
    /// Env variable: `APPOPTICS_SETTINGS_TIMEOUT_INTERVAL`
    pub fn set_settings_timeout_interval(&mut self, seconds: u64) -> &mut Self {
        self.config
            .reporter_properties
            .settings_timeout_interval
            .set_code(seconds);
        self
    }

    /// **Default**: `20`
    ///
    /// Env variable: `APPOPTICS_PING_INTERVAL`
    pub fn set_ping_interval(&mut self, seconds: u64) -> &mut Self {
        self.config.reporter_properties.ping_interval.set_code(seconds);
        self
    }

    /// **Default**: `500`
    ///
    /// Env variable: `APPOPTICS_RETRY_DELAY_INITIAL`
    pub fn set_retry_delay_initial(&mut self, millis: u64) -> &mut Self {
        self.config
            .reporter_properties
            .retry_delay_initial
            .set_code(millis);
        self
    }

    /// **Default**: `60`
    ///
    /// Env variable: `APPOPTICS_RETRY_DELAY_MAX`
    pub fn set_retry_delay_max(&mut self, seconds: u64) -> &mut Self {
        self.config
            .reporter_properties
            .retry_delay_max
            .set_code(seconds);
        self
    }

    /// **Default**: `20`
    ///
    /// Env variable: `APPOPTICS_REDIRECT_MAX`
    pub fn set_redirect_max(&mut self, redirect_max: u64) -> &mut Self {
        self.config
            .reporter_properties
            .redirect_max
            .set_code(redirect_max);
        self
    }

    /// **Default**: `10`
    ///
    /// Env variable: `APPOPTICS_RETRY_LOG_THRESHOLD`
    pub fn set_retry_log_threshold(&mut self, threshold: u64) -> &mut Self {
        self.config
            .reporter_properties
            .retry_log_threshold
            .set_code(threshold);
        self
    }

    /// **Default**: `20`
    ///
    /// Env variable: `APPOPTICS_MAX_RETRIES`
    pub fn set_max_retries(&mut self, max_retries: u64) -> &mut Self {
        self.config.reporter_properties.max_retries.set_code(max_retries);
        self
    }

    /// Ordered transaction filters, the first one matching a transaction decides its tracing
    /// mode. Invalid filters are rejected together when building the configuration.
    ///
    /// **Default**: `(none)`
    ///
    /// Only configurable from code or the configuration file
    pub fn set_transaction_settings(&mut self, filters: Vec<TransactionFilterSpec>) -> &mut Self {
        self.config
            .transaction_settings
            .set_code(TransactionSettings(filters));
        self
    }

    /// Disables the agent
    ///
    /// **Default**: `false`
    ///
    /// Env variable: `APPOPTICS_DISABLED`
    pub fn set_disabled(&mut self, disabled: bool) -> &mut Self {
        self.config.disabled.set_code(disabled);
        self
    }

    /// **Default**: `warn`
    ///
    /// Env variable: `APPOPTICS_DEBUG_LEVEL`
    pub fn set_debug_level(&mut self, debug_level: LevelFilter) -> &mut Self {
        self.config.debug_level.set_code(Token::Known(debug_level));
        self
    }
}
