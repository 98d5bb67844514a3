// src/lib.rs

#[macro_use]
pub mod log;

pub mod analysis;
pub mod archive;
pub mod config;
pub mod core;
pub mod crawl;
pub mod csv;
pub mod error;
pub mod export;
pub mod progress;
pub mod scrape;

#[cfg(feature = "cli")]
pub mod cli;

pub use analysis::{AnalysisResult, AnalyzerConfig, SentenceCooccurrenceAnalyzer};
