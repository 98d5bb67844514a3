// src/archive.rs
//
// Historical captures via the Wayback Machine CDX index.
// One capture per site per year (first successful capture of that year).

use std::collections::BTreeMap;

use url::Url;

use crate::config::{consts::{CDX_ENDPOINT, WAYBACK_PREFIX}, ArchiveOptions};
use crate::core::PageSource;
use crate::error::FetchError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// `YYYYMMDDhhmmss`
    pub timestamp: String,
    pub year: i32,
    /// URL as it was captured.
    pub original: String,
}

impl Snapshot {
    /// Raw capture, without the archive's toolbar and link rewriting.
    pub fn capture_url(&self) -> String {
        format!("{WAYBACK_PREFIX}{}id_/{}", self.timestamp, self.original)
    }
}

pub fn cdx_query_url(site: &str, years: &ArchiveOptions) -> Result<Url, FetchError> {
    let from = years.from_year.to_string();
    let to = years.to_year.to_string();
    Url::parse_with_params(
        CDX_ENDPOINT,
        &[
            ("url", site),
            ("output", "json"),
            ("fl", "timestamp,original"),
            ("filter", "statuscode:200"),
            ("collapse", "timestamp:4"),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ],
    )
    .map_err(|_| FetchError::Url(site.to_string()))
}

/// Parse a CDX JSON listing (`[["timestamp","original"], [...], ...]`).
/// An empty body means no captures.
pub fn parse_cdx(site: &str, body: &str, years: &ArchiveOptions) -> Result<Vec<Snapshot>, FetchError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<Vec<String>> = serde_json::from_str(body).map_err(|e| FetchError::Listing {
        site: site.to_string(),
        reason: e.to_string(),
    })?;

    let mut by_year: BTreeMap<i32, Snapshot> = BTreeMap::new();
    for row in rows.into_iter().skip(1) {
        let [timestamp, original] = <[String; 2]>::try_from(row).map_err(|r| FetchError::Listing {
            site: site.to_string(),
            reason: format!("expected 2 fields, got {}", r.len()),
        })?;
        let Some(year) = timestamp.get(..4).and_then(|y| y.parse::<i32>().ok()) else {
            logw!("Skipping capture with bad timestamp {timestamp:?} for {site}");
            continue;
        };
        if !years.years().contains(&year) {
            continue;
        }
        by_year.entry(year).or_insert(Snapshot { timestamp, year, original });
    }
    Ok(by_year.into_values().collect())
}

/// One capture per year in range, oldest first.
pub fn list_snapshots<P: PageSource + ?Sized>(
    source: &P,
    site: &str,
    years: &ArchiveOptions,
) -> Result<Vec<Snapshot>, FetchError> {
    let url = cdx_query_url(site, years)?;
    let body = source.fetch(url.as_str())?;
    let snaps = parse_cdx(site, &body, years)?;
    logf!("{site}: {} captures in {}..={}", snaps.len(), years.from_year, years.to_year);
    Ok(snaps)
}
