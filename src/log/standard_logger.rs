use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::error::HerdImmunityError;
use crate::log::LogConfiguration;

const STDERR_APPENDER: &str = "stderr";

// ISO 8601 timestamp, color coded level, then the emitting module
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";

impl LogConfiguration {
    fn build_config(&self) -> Result<Config, HerdImmunityError> {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        // Module loggers are additive, so they write through the root's appender.
        let loggers = self
            .module_levels
            .iter()
            .map(|(module, level)| Logger::builder().build(module.clone(), *level));

        Config::builder()
            .appender(Appender::builder().build(STDERR_APPENDER, Box::new(stderr)))
            .loggers(loggers)
            .build(
                Root::builder()
                    .appender(STDERR_APPENDER)
                    .build(self.global_level),
            )
            .map_err(|errors| {
                HerdImmunityError::HerdImmunityError(format!(
                    "invalid log configuration: {errors}"
                ))
            })
    }

    /// Installs a `log4rs` logger matching the current filters, replacing the one
    /// installed by an earlier call.
    pub(super) fn install(&mut self) -> Result<(), HerdImmunityError> {
        let config = self.build_config()?;
        if let Some(handle) = &self.handle {
            handle.set_config(config);
            return Ok(());
        }
        match log4rs::init_config(config) {
            Ok(handle) => self.handle = Some(handle),
            // Another logger owns the facade; its level is all that can be adjusted.
            Err(_) => log::set_max_level(self.max_level()),
        }
        Ok(())
    }
}
