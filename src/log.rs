// src/log.rs
//
// Full trace goes to .store/debug.log; warnings and errors also reach stderr.
// RUST_LOG overrides the level passed to `init`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Mutex, Once};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::consts::{LOG_FILE, STORE_DIR};

/// HTTP internals are pinned to `warn`; their debug output drowns the crawl log.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "html5ever", "selectors"];

static INIT: Once = Once::new();

fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut directives = String::from(level);
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    EnvFilter::new(directives)
}

pub fn log_path() -> PathBuf {
    PathBuf::from(STORE_DIR).join(LOG_FILE)
}

/// Install the global subscriber. Later calls are no-ops.
/// If the log file cannot be opened, logging falls back to stderr only.
pub fn init(level: &str) {
    INIT.call_once(|| {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(LevelFilter::WARN);

        let file = fs::create_dir_all(STORE_DIR)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(log_path()));

        let file_layer = file.ok().map(|f| {
            fmt::layer()
                .with_writer(Mutex::new(f))
                .with_ansi(false)
                .with_target(true)
                .with_filter(build_filter(level))
        });

        let _ = tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .try_init();
    });
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
