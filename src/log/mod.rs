//! Diagnostic logging: messages about what the program is doing, as opposed to the
//! event [`report`](crate::report) of what happens to the population.
//!
//! Messages are written with the usual `error!`, `warn!`, `info!`, `debug!` and `trace!`
//! macros, re-exported here. Nothing is printed until a [`LogLevelSpec`] is applied,
//! which the command line does for `--log-level`:
//!
//! ```rust
//! use herd_immunity::log::LogLevelSpec;
//!
//! // Warnings from everywhere, every message from the engine.
//! let spec: LogLevelSpec = "warn,herd_immunity::simulation=trace".parse().unwrap();
//! spec.apply().unwrap();
//! ```
//!
//! With the `logging` feature (on by default) messages go to stderr through `log4rs`.
//! Without it only the `log` facade's maximum level is kept up to date.
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

#[cfg(feature = "logging")]
use log4rs::Handle;

use crate::error::HerdImmunityError;

/// The filters installed so far. Loggers are process-wide, so there is exactly one.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

struct LogConfiguration {
    /// Applies to every module without a filter of its own.
    global_level: LevelFilter,
    module_levels: BTreeMap<String, LevelFilter>,
    #[cfg(feature = "logging")]
    handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        LogConfiguration {
            global_level: LevelFilter::Off,
            module_levels: BTreeMap::new(),
            #[cfg(feature = "logging")]
            handle: None,
        }
    }
}

impl LogConfiguration {
    /// Returns true if any filter changed.
    fn merge(&mut self, spec: &LogLevelSpec) -> bool {
        let mut changed = false;
        if let Some(level) = spec.global {
            changed |= std::mem::replace(&mut self.global_level, level) != level;
        }
        for (module, level) in &spec.modules {
            changed |= self.module_levels.insert(module.clone(), *level) != Some(*level);
        }
        changed
    }

    /// The most verbose level that any filter lets through.
    fn max_level(&self) -> LevelFilter {
        self.module_levels
            .values()
            .copied()
            .fold(self.global_level, Ord::max)
    }
}

fn log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// A parsed `--log-level` value: a comma separated list holding at most one bare level
/// (`"info"`), which applies everywhere, and any number of `module=level` pairs
/// (`"herd_immunity::report=debug"`). Later entries win.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LogLevelSpec {
    pub global: Option<LevelFilter>,
    pub modules: Vec<(String, LevelFilter)>,
}

impl FromStr for LogLevelSpec {
    type Err = HerdImmunityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parse_level = |level: &str| {
            LevelFilter::from_str(level.trim()).map_err(|_| {
                HerdImmunityError::ParameterError(format!("invalid log level: {level}"))
            })
        };

        let mut parsed = LogLevelSpec::default();
        for part in value.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            match part.split_once('=') {
                Some((module, level)) => {
                    parsed
                        .modules
                        .push((module.trim().to_string(), parse_level(level)?));
                }
                None => parsed.global = Some(parse_level(part)?),
            }
        }
        Ok(parsed)
    }
}

impl LogLevelSpec {
    /// Merges these filters into the process-wide configuration and reinstalls the
    /// logger if anything changed. Filters set by earlier calls stay in place unless
    /// overridden here.
    ///
    /// # Errors
    ///
    /// Returns an error if the logging backend rejects the resulting configuration.
    pub fn apply(&self) -> Result<(), HerdImmunityError> {
        let mut configuration = log_configuration();
        if configuration.merge(self) {
            configuration.install()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{log_configuration, LogConfiguration, LogLevelSpec};
    use log::{error, trace, LevelFilter};
    use std::sync::{LazyLock, Mutex};

    // Applied filters are process-wide, so these tests take turns.
    static TEST_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

    fn reset() {
        let mut configuration = log_configuration();
        configuration.global_level = LevelFilter::Off;
        configuration.module_levels.clear();
        configuration.install().unwrap();
    }

    #[test]
    fn parses_global_level() {
        let spec: LogLevelSpec = "info".parse().unwrap();
        assert_eq!(spec.global, Some(LevelFilter::Info));
        assert!(spec.modules.is_empty());
        assert_eq!("".parse::<LogLevelSpec>().unwrap(), LogLevelSpec::default());
    }

    #[test]
    fn parses_module_levels() {
        let spec: LogLevelSpec = "warn, herd_immunity::simulation=Trace,log4rs=off"
            .parse()
            .unwrap();
        assert_eq!(spec.global, Some(LevelFilter::Warn));
        assert_eq!(
            spec.modules,
            vec![
                (
                    "herd_immunity::simulation".to_string(),
                    LevelFilter::Trace
                ),
                ("log4rs".to_string(), LevelFilter::Off),
            ]
        );
    }

    #[test]
    fn rejects_unknown_level() {
        assert!("loud".parse::<LogLevelSpec>().is_err());
        assert!("herd_immunity=loud".parse::<LogLevelSpec>().is_err());
    }

    #[test]
    fn merge_reports_changes() {
        let mut configuration = LogConfiguration::default();
        let spec: LogLevelSpec = "info,herd_immunity::report=debug".parse().unwrap();
        assert!(configuration.merge(&spec));
        assert!(!configuration.merge(&spec));
        assert_eq!(configuration.max_level(), LevelFilter::Debug);

        let quieter: LogLevelSpec = "herd_immunity::report=warn".parse().unwrap();
        assert!(configuration.merge(&quieter));
        assert_eq!(configuration.global_level, LevelFilter::Info);
        assert_eq!(configuration.max_level(), LevelFilter::Info);
    }

    #[test]
    fn apply_installs_global_level() {
        let _guard = TEST_MUTEX.lock().unwrap();
        reset();

        "error".parse::<LogLevelSpec>().unwrap().apply().unwrap();
        assert_eq!(log_configuration().global_level, LevelFilter::Error);
        assert_eq!(log::max_level(), LevelFilter::Error);
        error!("apply_installs_global_level: emitted");
        trace!("apply_installs_global_level: NOT EMITTED");

        reset();
        assert_eq!(log::max_level(), LevelFilter::Off);
    }

    #[test]
    fn apply_keeps_earlier_filters() {
        let _guard = TEST_MUTEX.lock().unwrap();
        reset();

        "warn".parse::<LogLevelSpec>().unwrap().apply().unwrap();
        "herd_immunity::simulation=trace"
            .parse::<LogLevelSpec>()
            .unwrap()
            .apply()
            .unwrap();
        {
            let configuration = log_configuration();
            assert_eq!(configuration.global_level, LevelFilter::Warn);
            assert_eq!(
                configuration.module_levels.get("herd_immunity::simulation"),
                Some(&LevelFilter::Trace)
            );
        }
        // The facade must let through the most verbose module.
        assert_eq!(log::max_level(), LevelFilter::Trace);

        reset();
    }
}
