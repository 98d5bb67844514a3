// src/export.rs
//
// Write an Accumulator to disk as JSON or as a CSV/TSV table, either into one
// file or one file per site.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::analysis::{Accumulator, AnalysisResult, TallyKey};
use crate::config::{ExportFormat, ExportOptions, ExportType};
use crate::core::sanitize::sanitize_site_filename;
use crate::csv::{table_headers, to_export_string};
use crate::error::ExportError;

/// A site's entry in the JSON export: one record for a live crawl, or
/// year -> record in snapshot mode.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SiteEntry<'a> {
    Live(&'a AnalysisResult),
    Years(BTreeMap<i32, &'a AnalysisResult>),
}

/// Group tallies by site for the JSON shape.
pub fn json_view(acc: &Accumulator) -> BTreeMap<&str, SiteEntry<'_>> {
    let mut out: BTreeMap<&str, SiteEntry<'_>> = BTreeMap::new();
    for (key, tally) in acc.iter() {
        match key.year {
            None => {
                out.insert(key.site.as_str(), SiteEntry::Live(tally));
            }
            Some(year) => {
                let entry = out
                    .entry(key.site.as_str())
                    .or_insert_with(|| SiteEntry::Years(BTreeMap::new()));
                match entry {
                    SiteEntry::Years(years) => {
                        years.insert(year, tally);
                    }
                    SiteEntry::Live(_) => {
                        logw!("{key}: site already has a live record, snapshot dropped from JSON");
                    }
                }
            }
        }
    }
    out
}

fn render<'a, I>(export: &ExportOptions, acc: &Accumulator, rows: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = (&'a TallyKey, &'a AnalysisResult)>,
{
    match export.format.delim() {
        None => {
            let mut sub = Accumulator::new_like(acc);
            for (k, t) in rows {
                sub.record(k, t);
            }
            let mut s = serde_json::to_string_pretty(&json_view(&sub))?;
            s.push('\n');
            Ok(s)
        }
        Some(sep) => {
            let headers = export.include_headers.then(|| table_headers(acc));
            Ok(to_export_string(headers.as_deref(), rows, sep))
        }
    }
}

/// Write everything to `export.out_path()`. Returns the paths written.
pub fn write_export(export: &ExportOptions, acc: &Accumulator) -> Result<Vec<PathBuf>, ExportError> {
    match export.export_type {
        ExportType::SingleFile => write_export_single(export, acc).map(|p| vec![p]),
        ExportType::PerSite => write_export_per_site(export, acc),
    }
}

pub fn write_export_single(export: &ExportOptions, acc: &Accumulator) -> Result<PathBuf, ExportError> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let contents = render(export, acc, acc.iter())?;
    fs::write(&path, contents).map_err(|e| ExportError::io(&path, e))?;
    logf!("Wrote {} records to {}", acc.len(), path.display());
    Ok(path)
}

/// One file per site inside the directory `export.out_path()`.
pub fn write_export_per_site(export: &ExportOptions, acc: &Accumulator) -> Result<Vec<PathBuf>, ExportError> {
    let outdir = export.out_path();
    ensure_directory(&outdir)?;

    let mut by_site: BTreeMap<&str, Vec<(&TallyKey, &AnalysisResult)>> = BTreeMap::new();
    for (key, tally) in acc.iter() {
        by_site.entry(key.site.as_str()).or_default().push((key, tally));
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(by_site.len());
    let ext = export.format.ext();

    for (n, (site, rows)) in by_site.into_iter().enumerate() {
        let stem = sanitize_site_filename(site, n);
        let path = resolve_site_filename(&outdir, &stem, &mut seen, ext);
        let contents = render(export, acc, rows)?;
        fs::write(&path, contents).map_err(|e| ExportError::io(&path, e))?;
        logd!("{site} -> {}", path.display());
        written.push(path);
    }

    logf!("Wrote {} site files to {}", written.len(), outdir.display());
    Ok(written)
}

pub fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;
    }
    Ok(())
}

/// Duplicate stems within one run become `<stem> (2).ext`, `<stem> (3).ext`, …
pub fn resolve_site_filename(
    dir: &Path,
    stem: &str,
    seen_names: &mut HashMap<String, usize>,
    ext: &str,
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };
    *count += 1;
    dir.join(filename)
}

/// JSON or table text for the whole accumulator, as it would be written.
pub fn export_string(format: ExportFormat, include_headers: bool, acc: &Accumulator) -> Result<String, ExportError> {
    let mut opts = ExportOptions::default();
    opts.format = format;
    opts.include_headers = include_headers;
    render(&opts, acc, acc.iter())
}
