//! Diagnostic logging for the simulation. Not to be confused with _reporting_ (see
//! `crate::report`), which records the per-round state counts of a run.
//!
//! The five `log` macros are re-exported from here. The library emits:
//!  - `info`: population construction and parameter loading
//!  - `debug`: the state counts after every round, admissions to the hospital
//!  - `trace`: every individual state transition and infection
//!
//! Logging is off until something turns it on, either the runner's `--log-level` option or one
//! of the functions below:
//!
//! ```rust
//! use epidemic_sim::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! // Round summaries everywhere, every infection event from the transmission step.
//! set_log_level(LevelFilter::Debug);
//! set_module_filter("epidemic_sim::population::transmission", LevelFilter::Trace);
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use crate::hashing::HashMap;

static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// The process-wide logging state: a root level plus per-module overrides keyed by module path
/// (e.g. `"epidemic_sim::spatial"`). Every change is pushed to the installed backend.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_levels: HashMap<String, LevelFilter>,

    #[cfg(feature = "logging")]
    root_handle: Option<log4rs::Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: LevelFilter::Off,
            module_levels: HashMap::default(),

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    /// Applies `filters` and reconfigures the backend once if any of them changed a level.
    fn set_module_filters<S: AsRef<str>>(&mut self, filters: &[(S, LevelFilter)]) {
        let mut changed = false;
        for (module, level) in filters {
            let previous = self.module_levels.insert(module.as_ref().to_string(), *level);
            changed |= previous != Some(*level);
        }
        if changed {
            self.set_config();
        }
    }

    fn remove_module_filter(&mut self, module: &str) {
        if self.module_levels.remove(module).is_some() {
            self.set_config();
        }
    }
}

fn log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Turns on every message. Same as `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Turns off every message not covered by a module filter.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the level for modules without their own filter.
pub fn set_log_level(level: LevelFilter) {
    log_configuration().set_log_level(level);
}

/// The level applied to modules without their own filter.
#[must_use]
pub fn log_level() -> LevelFilter {
    log_configuration().global_log_level
}

/// Sets the level for `module_path` and everything below it.
pub fn set_module_filter(module_path: &str, level: LevelFilter) {
    log_configuration().set_module_filters(&[(module_path, level)]);
}

/// Bulk version of [`set_module_filter`].
pub fn set_module_filters<S: AsRef<str>>(module_filters: &[(S, LevelFilter)]) {
    log_configuration().set_module_filters(module_filters);
}

/// Drops the filter for `module_path`; the global level applies to it again.
pub fn remove_module_filter(module_path: &str) {
    log_configuration().remove_module_filter(module_path);
}

#[cfg(test)]
mod tests {
    use super::*;

    // The configuration is global, so these tests must not interleave.
    static TEST_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

    #[test]
    fn global_level_round_trips() {
        let _guard = TEST_MUTEX.lock().unwrap();
        set_log_level(LevelFilter::Error);
        assert_eq!(log_level(), LevelFilter::Error);
        error!("emitted at error");
        trace!("not emitted");

        enable_logging();
        assert_eq!(log_level(), LevelFilter::Trace);
        disable_logging();
        assert_eq!(log_level(), LevelFilter::Off);
    }

    #[test]
    fn module_filters_are_set_replaced_and_removed() {
        let _guard = TEST_MUTEX.lock().unwrap();
        set_module_filters(&[
            ("epidemic_sim::spatial", LevelFilter::Error),
            ("epidemic_sim::population", LevelFilter::Debug),
        ]);
        set_module_filter("epidemic_sim::spatial", LevelFilter::Warn);
        {
            let config = log_configuration();
            assert_eq!(
                config.module_levels.get("epidemic_sim::spatial"),
                Some(&LevelFilter::Warn)
            );
            assert_eq!(
                config.module_levels.get("epidemic_sim::population"),
                Some(&LevelFilter::Debug)
            );
        }

        remove_module_filter("epidemic_sim::spatial");
        remove_module_filter("epidemic_sim::population");
        assert!(log_configuration().module_levels.is_empty());
    }
}
