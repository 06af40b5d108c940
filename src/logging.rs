//! Logger setup
//!
//! The library only talks to the `log` facade; binaries pick the backend.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global `env_logger` once; later calls are ignored.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "softpipe=debug"). Falls back to `RUST_LOG`, then to `info`.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        // try_init: a test harness may already have installed a logger
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
