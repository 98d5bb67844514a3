// src/config/mod.rs
pub mod consts;
pub mod options;
mod loader;

pub use options::{AppConfig, ArchiveOptions, CrawlOptions, ExportFormat, ExportOptions, ExportType};
