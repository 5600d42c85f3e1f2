//! Backend used when the `logging` feature is off. Nothing is written anywhere; only the
//! global level of the `log` facade is kept in sync so level queries behave the same.

use crate::log::LogConfiguration;

impl LogConfiguration {
    pub(in crate::log) fn set_config(&mut self) {
        log::set_max_level(self.global_log_level);
    }
}
