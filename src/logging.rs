//! Thin `log`-crate wrapper used by the CLI demo and available to callers
//! embedding this crate in a hosted application. The protocol core logs
//! through the plain `log` macros directly (state transitions at `trace`,
//! discarded-frame conditions at `warn`) rather than through these
//! wrappers; [`crate::events`] carries the same milestones as structured
//! notifications for callers who want to react to them programmatically
//! instead of scraping a log stream.

use log::{debug, error, info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate, reading
/// `RUST_LOG` as usual. Intended for binaries (the `lwpkt-cli` demo);
/// library code should not call this.
pub fn init_logger() {
    env_logger::init();
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}
