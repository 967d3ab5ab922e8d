//! Logging setup and per-module switchable logging macros.
//!
//! A module opts in by defining the flag, then uses the macros exported at
//! the crate root:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("measurement {} stored", id);
//! ```
//! Records carry the calling module path as their target, so `RUST_LOG`
//! filters such as `pressure_tracker::tracker=debug` apply to them.

use log::LevelFilter;

/// Installs `env_logger` at `Info`, letting `RUST_LOG` override it. Safe to
/// call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!(target: module_path!(), $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!(target: module_path!(), $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!(target: module_path!(), $($arg)*);
        }
    };
}

/// Errors ignore `ENABLE_LOGS`; a failure is always reported.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!(target: module_path!(), $($arg)*);
    };
}
