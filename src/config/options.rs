// src/config/options.rs
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::MatchPolicy;
use super::consts::*;

/// Everything `config.yaml` can hold. Only `tax_groups` and `offshore_words`
/// are required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub websites: Vec<String>,
    pub tax_groups: BTreeMap<String, Vec<String>>,
    pub offshore_words: Vec<String>,
    #[serde(default)]
    pub analysis: MatchPolicy,
    #[serde(default)]
    pub crawl: CrawlOptions,
    #[serde(default)]
    pub archive: Option<ArchiveOptions>,
    #[serde(default)]
    pub export: ExportOptions,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlOptions {
    /// Upper bound on pages fetched per site.
    pub max_pages: usize,
    pub workers: usize,
    pub request_pause_ms: u64,
    pub timeout_secs: u64,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: MAX_PAGES,
            workers: WORKERS,
            request_pause_ms: REQUEST_PAUSE_MS,
            timeout_secs: TIMEOUT_SECS,
        }
    }
}

/// Snapshot mode: one archived capture per site per year, inclusive range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveOptions {
    pub from_year: i32,
    pub to_year: i32,
}

impl ArchiveOptions {
    pub fn years(&self) -> std::ops::RangeInclusive<i32> { self.from_year..=self.to_year }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportType {
    #[default]
    SingleFile,
    PerSite,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }
    /// Field separator for the tabular formats.
    pub fn delim(&self) -> Option<char> {
        match self {
            ExportFormat::Json => None,
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub export_type: ExportType,
    pub include_headers: bool,
    #[serde(rename = "out")]
    out_path: OutputPath,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            export_type: ExportType::SingleFile,
            include_headers: true,
            out_path: OutputPath::default(),
        }
    }
}

impl ExportOptions {
    /// Single file: `<dir>/<stem>.<ext>`, the extension follows the format
    /// unless the user gave one. Per site: the directory.
    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        match self.export_type {
            ExportType::SingleFile => {
                let mut name = self.out_path.file_stem.clone();
                name.push(".");
                match &self.out_path.ext {
                    Some(ext) => name.push(ext),
                    None => name.push(self.format.ext()),
                }
                path.push(name);
            }
            ExportType::PerSite => {}
        }
        path
    }

    /// `out` is read from YAML before `export_type` is known to mean a
    /// directory. Re-read it as one when exporting per site.
    pub(crate) fn resolve_loaded_path(&mut self) {
        if self.export_type == ExportType::PerSite && self.out_path != OutputPath::default() {
            let raw: String = self.out_path.clone().into();
            self.set_path(&raw);
        }
    }

    /// Parse a user path into dir + stem (+ explicit extension).
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        match self.export_type {
            ExportType::SingleFile => {
                let p = Path::new(s);
                if let Some(parent) = p.parent() {
                    self.out_path.dir = parent.to_path_buf();
                }
                if let Some(stem) = p.file_stem() {
                    self.out_path.file_stem = stem.to_os_string();
                }
                self.out_path.ext = p.extension().map(|e| e.to_os_string());
            }
            ExportType::PerSite => {
                self.out_path.dir = PathBuf::from(s);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
    ext: Option<OsString>,
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
            ext: None,
        }
    }
}

impl From<String> for OutputPath {
    fn from(s: String) -> Self {
        let p = Path::new(s.trim());
        let mut out = OutputPath::default();
        if let Some(parent) = p.parent() {
            out.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            out.file_stem = stem.to_os_string();
        }
        out.ext = p.extension().map(|e| e.to_os_string());
        out
    }
}

impl From<OutputPath> for String {
    fn from(p: OutputPath) -> Self {
        let mut name = p.file_stem;
        if let Some(ext) = p.ext {
            name.push(".");
            name.push(ext);
        }
        p.dir.join(name).to_string_lossy().into_owned()
    }
}
