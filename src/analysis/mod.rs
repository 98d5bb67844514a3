// src/analysis/mod.rs
//! Sentence-scoped co-occurrence counting.
//!
//! Input is plain text (markup already stripped); output is per-group country
//! counts, per-term offshore counts and the set of countries seen. Nothing in
//! here performs I/O.
//!
//! ```text
//! text ─ Segmenter::segment ─▶ sentences ─ nested match ─▶ AnalysisResult
//!                                                             │
//!                                    Accumulator::record ◀────┘ (caller side)
//! ```

mod accumulator;
mod analyzer;
mod segment;

pub use accumulator::{Accumulator, TallyKey};
pub use analyzer::{
    AnalysisResult, AnalyzerConfig, CaseMode, MatchPolicy, OffshoreCounting,
    SentenceCooccurrenceAnalyzer,
};
pub use segment::{HeuristicSegmenter, Segmenter};
