// src/analysis/analyzer.rs
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use super::segment::{HeuristicSegmenter, Segmenter};

/* ---------------- Policy ---------------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// Plain substring test.
    #[default]
    Sensitive,
    /// Both sides lowercased before the substring test.
    Insensitive,
}

/// How offshore terms are counted when a sentence contains country matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffshoreCounting {
    /// Every country match rescans the sentence, so a term is counted once
    /// per country match (two countries in one sentence count a term twice).
    #[default]
    PerCountryMatch,
    /// A term is counted at most once per sentence that has any country match.
    PerSentence,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    #[serde(default)]
    pub case: CaseMode,
    #[serde(default)]
    pub offshore_counting: OffshoreCounting,
}

/* ---------------- Configuration ---------------- */

/// Validated analyzer vocabulary. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyzerConfig {
    groups: BTreeMap<String, Vec<String>>,
    offshore_terms: Vec<String>,
    policy: MatchPolicy,
}

impl AnalyzerConfig {
    /// Empty country or term strings are rejected: they would match every sentence.
    pub fn new(
        groups: BTreeMap<String, Vec<String>>,
        offshore_terms: Vec<String>,
        policy: MatchPolicy,
    ) -> Result<Self, ConfigError> {
        for (group, countries) in &groups {
            if group.trim().is_empty() {
                return Err(ConfigError::Invalid("tax group with empty name".into()));
            }
            if countries.iter().any(|c| c.is_empty()) {
                return Err(ConfigError::Invalid(format!("empty country in tax group '{group}'")));
            }
        }
        if offshore_terms.iter().any(|t| t.is_empty()) {
            return Err(ConfigError::Invalid("empty offshore term".into()));
        }
        Ok(Self { groups, offshore_terms, policy })
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<String>> { &self.groups }
    pub fn offshore_terms(&self) -> &[String] { &self.offshore_terms }
    pub fn policy(&self) -> MatchPolicy { self.policy }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/* ---------------- Result ---------------- */

/// Counts for one text, or any sum of them.
///
/// Serialized with the field names used by `results.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "country_counts")]
    pub group_counts: BTreeMap<String, u64>,
    #[serde(rename = "offshore_mentions")]
    pub term_counts: BTreeMap<String, u64>,
    pub countries_found: BTreeSet<String>,
}

impl AnalysisResult {
    /// Every configured group and term present with a zero count.
    pub fn zeroed(config: &AnalyzerConfig) -> Self {
        Self {
            group_counts: config.groups.keys().map(|g| (g.clone(), 0)).collect(),
            term_counts: config.offshore_terms.iter().map(|t| (t.clone(), 0)).collect(),
            countries_found: BTreeSet::new(),
        }
    }

    /// Add counts and union found countries.
    pub fn absorb(&mut self, other: &AnalysisResult) {
        for (k, v) in &other.group_counts {
            *self.group_counts.entry(k.clone()).or_insert(0) += v;
        }
        for (k, v) in &other.term_counts {
            *self.term_counts.entry(k.clone()).or_insert(0) += v;
        }
        self.countries_found.extend(other.countries_found.iter().cloned());
    }

    pub fn is_zero(&self) -> bool {
        self.countries_found.is_empty()
            && self.group_counts.values().all(|&v| v == 0)
            && self.term_counts.values().all(|&v| v == 0)
    }

    pub fn group_total(&self) -> u64 { self.group_counts.values().sum() }
    pub fn term_total(&self) -> u64 { self.term_counts.values().sum() }
}

fn bump(map: &mut BTreeMap<String, u64>, key: &str) {
    if let Some(n) = map.get_mut(key) {
        *n += 1;
    }
}

/* ---------------- Analyzer ---------------- */

/// Configured string plus its lowercased form.
#[derive(Clone, Debug)]
struct Needle {
    text: String,
    folded: String,
}

impl Needle {
    fn new(s: &str) -> Self {
        Self { text: s.to_string(), folded: s.to_lowercase() }
    }
    #[inline]
    fn probe(&self, case: CaseMode) -> &str {
        match case {
            CaseMode::Sensitive => &self.text,
            CaseMode::Insensitive => &self.folded,
        }
    }
}

#[derive(Clone, Debug)]
struct Group {
    name: String,
    countries: Vec<Needle>,
}

/// Counts country mentions per tax group, and offshore terms that share a
/// sentence with a country mention.
///
/// `analyze` takes `&self` and touches no shared state, so one instance can
/// serve any number of threads.
#[derive(Clone, Debug)]
pub struct SentenceCooccurrenceAnalyzer<S = HeuristicSegmenter> {
    config: AnalyzerConfig,
    segmenter: S,
    groups: Vec<Group>,
    terms: Vec<Needle>,
}

impl SentenceCooccurrenceAnalyzer<HeuristicSegmenter> {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_segmenter(config, HeuristicSegmenter)
    }

    /// Validate and build in one step.
    pub fn from_parts(
        groups: BTreeMap<String, Vec<String>>,
        offshore_terms: Vec<String>,
        policy: MatchPolicy,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(AnalyzerConfig::new(groups, offshore_terms, policy)?))
    }
}

impl<S: Segmenter> SentenceCooccurrenceAnalyzer<S> {
    pub fn with_segmenter(config: AnalyzerConfig, segmenter: S) -> Self {
        let groups = config
            .groups
            .iter()
            .map(|(name, countries)| Group {
                name: name.clone(),
                countries: countries.iter().map(|c| Needle::new(c)).collect(),
            })
            .collect();
        let terms = config.offshore_terms.iter().map(|t| Needle::new(t)).collect();
        Self { config, segmenter, groups, terms }
    }

    pub fn config(&self) -> &AnalyzerConfig { &self.config }

    /// Analyze one block of plain text. Total over all inputs.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let MatchPolicy { case, offshore_counting } = self.config.policy;
        let mut result = AnalysisResult::zeroed(&self.config);

        for sentence in self.segmenter.segment(text) {
            let folded;
            let hay: &str = match case {
                CaseMode::Sensitive => sentence,
                CaseMode::Insensitive => {
                    folded = sentence.to_lowercase();
                    &folded
                }
            };

            // Terms present in this sentence; resolved on first country match.
            let mut terms_here: Option<Vec<&str>> = None;
            let mut matched = false;

            for group in &self.groups {
                for country in &group.countries {
                    if !hay.contains(country.probe(case)) {
                        continue;
                    }
                    matched = true;
                    bump(&mut result.group_counts, &group.name);
                    if !result.countries_found.contains(&country.text) {
                        result.countries_found.insert(country.text.clone());
                    }

                    if offshore_counting == OffshoreCounting::PerCountryMatch {
                        let here = terms_here.get_or_insert_with(|| self.terms_in(hay, case));
                        for term in here.iter() {
                            bump(&mut result.term_counts, term);
                        }
                    }
                }
            }

            if matched && offshore_counting == OffshoreCounting::PerSentence {
                for term in self.terms_in(hay, case) {
                    bump(&mut result.term_counts, term);
                }
            }
        }
        result
    }

    /// Configured spellings of the offshore terms contained in `hay`.
    fn terms_in<'s>(&'s self, hay: &str, case: CaseMode) -> Vec<&'s str> {
        self.terms
            .iter()
            .filter(|t| hay.contains(t.probe(case)))
            .map(|t| t.text.as_str())
            .collect()
    }
}
