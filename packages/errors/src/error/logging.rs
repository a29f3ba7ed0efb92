//! Structured logging for captured errors
//!
//! Provides env_logger-based logging that writes one record per error
//! through the standard log crate.

use super::types::Error;
use log::{debug, error, info, warn};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging of normalized errors through the `log` facade
pub struct ErrorLog;

impl ErrorLog {
    /// Initialize logging (should be called once at application startup)
    ///
    /// Configure levels via the `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - also print every frame of logged errors
    /// - `RUST_LOG=warn` - recovered panics and errors
    /// - `RUST_LOG=snag_errors=error` - errors only
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("error logging initialized");
        });
    }

    /// Initialize logging for test environments
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log an error with its type, fingerprint and innermost frame
    pub fn log_error(err: &Error) {
        error!(
            "{} (error_type: {}, fingerprint: {}, at: {})",
            err.message(),
            err.type_name(),
            Self::short_fingerprint(err),
            Self::origin(err)
        );
        Self::log_frames(err);
    }

    /// Log an error recovered from a panic
    pub fn log_recovered_panic(err: &Error) {
        warn!(
            "Recovered panic: {} (payload_type: {}, at: {})",
            err.message(),
            err.type_name(),
            Self::origin(err)
        );
        Self::log_frames(err);
    }

    /// Log every frame at debug level
    pub fn log_frames(err: &Error) {
        if log::log_enabled!(log::Level::Debug) {
            for frame in err.stack_frames() {
                debug!("    {frame}");
            }
        }
    }

    /// Fingerprint shortened for log lines
    fn short_fingerprint(err: &Error) -> String {
        let fingerprint = err.fingerprint();
        format!("#{}", &fingerprint[..12])
    }

    fn origin(err: &Error) -> String {
        err.stack_frames()
            .first()
            .map_or_else(|| "<no stack>".to_string(), ToString::to_string)
    }
}
