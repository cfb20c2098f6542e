// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{
    fmt::{self, Display},
    str::FromStr,
    sync::atomic::{AtomicUsize, Ordering},
};

static MAX_LOG_LEVEL: AtomicUsize = AtomicUsize::new(LevelFilter::Warn as usize);

pub(crate) fn set_max_level(lvl: LevelFilter) {
    MAX_LOG_LEVEL.store(lvl as usize, Ordering::Relaxed)
}

pub fn max_level() -> LevelFilter {
    LevelFilter::from_usize(MAX_LOG_LEVEL.load(Ordering::Relaxed))
}

#[repr(usize)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[non_exhaustive]
/// The level at which the agent will log
pub enum LevelFilter {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
}

impl LevelFilter {
    fn from_usize(value: usize) -> Self {
        match value {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("debug") {
            Ok(LevelFilter::Debug)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(LevelFilter::Info)
        } else if s.eq_ignore_ascii_case("warn") || s.eq_ignore_ascii_case("warning") {
            Ok(LevelFilter::Warn)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(LevelFilter::Error)
        } else if s.eq_ignore_ascii_case("off") {
            Ok(LevelFilter::Off)
        } else {
            Err("log level filter should be one of DEBUG, INFO, WARN, ERROR, OFF")
        }
    }
}

impl Display for LevelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filter = match self {
            LevelFilter::Debug => "debug",
            LevelFilter::Info => "info",
            LevelFilter::Warn => "warn",
            LevelFilter::Error => "error",
            LevelFilter::Off => "off",
        };

        write!(f, "{filter}")
    }
}

#[repr(usize)]
#[derive(Copy, Debug, Hash, PartialEq)]
pub enum Level {
    Error = 1, // this value must match with LevelFilter::Error
    Warn,
    Info,
    Debug,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };

        write!(f, "{level}")
    }
}

impl Clone for Level {
    #[inline]
    fn clone(&self) -> Level {
        *self
    }
}

impl PartialEq<LevelFilter> for Level {
    #[inline]
    fn eq(&self, other: &LevelFilter) -> bool {
        (*self as usize) == (*other as usize)
    }
}

impl PartialOrd<LevelFilter> for Level {
    #[inline]
    fn partial_cmp(&self, other: &LevelFilter) -> Option<std::cmp::Ordering> {
        Some((*self as usize).cmp(&(*other as usize)))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod test_logger {
    //! Implements a thread local, overridable logger
    //!
    //! Tests can locally intercept logs by calling to `activate_test_logger`
    //!
    //! ```no_run
    //! let _log_guard = appoptics_config::log::test_logger::activate_test_logger();
    //! // whatever is logged by the ao_(level)! macros will be stored
    //! appoptics_config::ao_warn!("my log");
    //! let logs = appoptics_config::log::test_logger::take_test_logs().unwrap();
    //! // logs should contain (Warn, "my log")
    //! ```
    use std::{cell::RefCell, panic::Location, sync::Arc};

    #[derive(Default)]
    struct TestLogger {
        logs: std::sync::Mutex<Vec<(crate::log::Level, String)>>,
        locations: std::sync::Mutex<Vec<&'static Location<'static>>>,
    }

    pub fn print_log(
        lvl: crate::log::Level,
        log: std::fmt::Arguments,
        location: &'static Location<'static>,
    ) {
        let _ = LOCAL_LOGGER.try_with(|l| {
            if let Some(l) = &*l.borrow() {
                if let Ok(mut logs) = l.logs.lock() {
                    logs.push((lvl, log.to_string()))
                }
                if let Ok(mut locations) = l.locations.lock() {
                    locations.push(location)
                }
            }
        });
    }

    thread_local! {
        static LOCAL_LOGGER: RefCell<Option<Arc<TestLogger>>> = const { RefCell::new(None) };
    }

    pub struct LoggerGuard {
        prev: Option<Arc<TestLogger>>,
    }

    impl Drop for LoggerGuard {
        fn drop(&mut self) {
            LOCAL_LOGGER.set(self.prev.take());
        }
    }

    pub fn activate_test_logger() -> LoggerGuard {
        let prev = LOCAL_LOGGER.replace(Some(Arc::new(TestLogger::default())));
        LoggerGuard { prev }
    }

    pub fn take_test_logs() -> Option<Vec<(crate::log::Level, String)>> {
        use std::ops::DerefMut;

        LOCAL_LOGGER
            .try_with(|l| {
                l.borrow()
                    .as_deref()
                    .and_then(|l| {
                        l.logs
                            .lock()
                            .ok()
                            .map(|mut logs| std::mem::take(logs.deref_mut()))
                    })
            })
            .ok()
            .flatten()
    }

    /// Source locations of the logs recorded since the last call, in order
    pub fn take_test_log_locations() -> Option<Vec<&'static Location<'static>>> {
        LOCAL_LOGGER
            .try_with(|l| {
                l.borrow().as_deref().and_then(|l| {
                    l.locations
                        .lock()
                        .ok()
                        .map(|mut locations| std::mem::take(&mut *locations))
                })
            })
            .ok()
            .flatten()
    }
}

#[doc(hidden)]
pub fn record_test_log(
    _lvl: Level,
    _log: fmt::Arguments,
    _location: &'static std::panic::Location<'static>,
) {
    #[cfg(any(test, feature = "test-utils"))]
    test_logger::print_log(_lvl, _log, _location);
}

pub fn print_log(lvl: Level, log: fmt::Arguments, file: &str, line: u32) {
    if lvl == LevelFilter::Error {
        eprintln!("\x1b[91m{lvl}\x1b[0m {file}:{line} - {log}");
    } else {
        eprintln!("\x1b[93m{lvl}\x1b[0m {file}:{line} - {log}");
    }
}

#[macro_export]
macro_rules! ao_debug {
    // debug!("a {} event", "log")
    ($($arg:tt)+) => {
      $crate::ao_log!($crate::log::Level::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! ao_info {
  // info!("a {} event", "log")
  ($($arg:tt)+) => {
    $crate::ao_log!($crate::log::Level::Info, $($arg)*)
  };
}

#[macro_export]
macro_rules! ao_warn {
  // warn!("a {} event", "log")
  ($($arg:tt)+) => {
    $crate::ao_log!($crate::log::Level::Warn, $($arg)*)
  };
}

#[macro_export]
macro_rules! ao_error {
  // error!("a {} event", "log")
  ($($arg:tt)+) => {
    $crate::ao_log!($crate::log::Level::Error, $($arg)*)
  };
}

#[macro_export]
macro_rules! ao_log {
    ($lvl:expr, $first:expr, $($rest:tt)*) => {{
      let lvl = $lvl;
      let loc = std::panic::Location::caller();
      if lvl <= $crate::log::max_level() {
        $crate::log::print_log(lvl, format_args!($first, $($rest)*), loc.file(), loc.line());
      }
      $crate::log::record_test_log(lvl, format_args!($first, $($rest)*), loc);
    }};

    ($lvl:expr, $first:expr) => {
      $crate::ao_log!($lvl, $first,)
    };
}

#[cfg(test)]
mod tests {
    use crate::log::{max_level, set_max_level, test_logger, Level, LevelFilter};

    #[test]
    fn test_default_level_filter() {
        assert_eq!(LevelFilter::default(), LevelFilter::Warn);
        assert_eq!(LevelFilter::from_usize(LevelFilter::Info as usize), LevelFilter::Info);
    }

    #[test]
    fn test_max_level() {
        let default_lvl = max_level();

        set_max_level(LevelFilter::Info);

        assert!(LevelFilter::Info == max_level());
        assert!(LevelFilter::Debug > max_level());
        assert!(LevelFilter::Error < max_level());

        set_max_level(default_lvl);
    }

    #[test]
    fn test_level_filter_from_str() {
        assert_eq!("WARNING".parse::<LevelFilter>(), Ok(LevelFilter::Warn));
        assert_eq!(" info ".parse::<LevelFilter>(), Ok(LevelFilter::Info));
        assert_eq!("off".parse::<LevelFilter>(), Ok(LevelFilter::Off));
        assert!("verbose".parse::<LevelFilter>().is_err());
    }

    #[test]
    fn test_level_and_filter() {
        const LEVELS: [Level; 4] = [Level::Error, Level::Warn, Level::Info, Level::Debug];
        const FILTERS: [LevelFilter; 4] = [
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
        ];

        for (lvl_index, lvl) in LEVELS.iter().enumerate() {
            assert!(*lvl > LevelFilter::Off);
            assert!(*lvl == FILTERS[lvl_index]);

            for filter_index in lvl_index..3 {
                assert!(*lvl < FILTERS[filter_index + 1]);
            }
        }
    }

    #[test]
    fn test_test_logger() {
        let _g = test_logger::activate_test_logger();
        ao_debug!("debug log {}", "foo");
        ao_warn!("warn log");
        let test_logs = test_logger::take_test_logs().unwrap();
        assert_eq!(
            &test_logs,
            &[
                (Level::Debug, "debug log foo".into()),
                (Level::Warn, "warn log".into())
            ]
        );
    }
}
