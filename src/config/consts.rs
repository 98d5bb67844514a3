// src/config/consts.rs

// Config
pub const DEFAULT_CONFIG: &str = "config.yaml";

// Local store (logs)
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";

// Net
pub const USER_AGENT: &str = concat!("tax_scrape/", env!("CARGO_PKG_VERSION"));
pub const TIMEOUT_SECS: u64 = 15;
pub const CDX_ENDPOINT: &str = "https://web.archive.org/cdx/search/cdx";
pub const WAYBACK_PREFIX: &str = "https://web.archive.org/web/";

// Crawl
pub const MAX_PAGES: usize = 200;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "results";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
