// src/analysis/accumulator.rs
//
// Running totals keyed by site (and snapshot year).
// Merge is plain addition + set union, so it is associative and commutative:
// partial accumulators from any split of the work combine to the same totals.

use std::collections::BTreeMap;
use std::fmt;

use super::analyzer::{AnalysisResult, AnalyzerConfig};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TallyKey {
    pub site: String,
    pub year: Option<i32>,
}

impl TallyKey {
    pub fn site(site: impl Into<String>) -> Self {
        Self { site: site.into(), year: None }
    }
    pub fn snapshot(site: impl Into<String>, year: i32) -> Self {
        Self { site: site.into(), year: Some(year) }
    }
}

impl fmt::Display for TallyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(y) => write!(f, "{} [{}]", self.site, y),
            None => f.write_str(&self.site),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator {
    /// Zero tally carrying the full key set; cloned for every new key.
    template: AnalysisResult,
    tallies: BTreeMap<TallyKey, AnalysisResult>,
}

impl Accumulator {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self { template: AnalysisResult::zeroed(config), tallies: BTreeMap::new() }
    }

    /// Empty accumulator with the same group and term key set.
    pub fn new_like(other: &Accumulator) -> Self {
        Self { template: other.template.clone(), tallies: BTreeMap::new() }
    }

    /// Make sure `key` is reported even if nothing is ever recorded for it.
    pub fn touch(&mut self, key: &TallyKey) -> &mut AnalysisResult {
        let template = &self.template;
        self.tallies.entry(key.clone()).or_insert_with(|| template.clone())
    }

    pub fn record(&mut self, key: &TallyKey, result: &AnalysisResult) {
        self.touch(key).absorb(result);
    }

    pub fn merge(&mut self, other: Accumulator) {
        for (key, tally) in other.tallies {
            self.record(&key, &tally);
        }
    }

    pub fn get(&self, key: &TallyKey) -> Option<&AnalysisResult> { self.tallies.get(key) }

    /// Tallies ordered by site, then year.
    pub fn iter(&self) -> impl Iterator<Item = (&TallyKey, &AnalysisResult)> {
        self.tallies.iter()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.template.group_counts.keys().map(String::as_str)
    }

    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.template.term_counts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.tallies.len() }
    pub fn is_empty(&self) -> bool { self.tallies.is_empty() }
}
