//! `log4rs` backend: a single stdout appender shared by the root logger and one logger per
//! module filter.

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::log::LogConfiguration;

// ISO 8601 timestamp, highlighted level, module path
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
const APPENDER: &str = "stdout";

impl LogConfiguration {
    fn build_config(&self) -> Result<Config, log4rs::config::runtime::ConfigErrors> {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        let loggers = self
            .module_levels
            .iter()
            .map(|(module, level)| Logger::builder().build(module.clone(), *level));

        Config::builder()
            .appender(Appender::builder().build(APPENDER, Box::new(stdout)))
            .loggers(loggers)
            .build(Root::builder().appender(APPENDER).build(self.global_log_level))
    }

    /// Installs the current configuration, replacing whatever was installed before.
    pub(in crate::log) fn set_config(&mut self) {
        let config = match self.build_config() {
            Ok(config) => config,
            Err(errors) => {
                eprintln!("invalid logging configuration: {errors}");
                return;
            }
        };

        match &self.root_handle {
            Some(handle) => handle.set_config(config),
            None => match log4rs::init_config(config) {
                Ok(handle) => self.root_handle = Some(handle),
                // Another logger owns the facade; only its level can be honored.
                Err(_) => log::set_max_level(self.global_log_level),
            },
        }
    }
}
