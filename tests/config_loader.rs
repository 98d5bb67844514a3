// tests/config_loader.rs
use std::fs;
use std::path::PathBuf;

use tax_scrape::analysis::{CaseMode, OffshoreCounting, SentenceCooccurrenceAnalyzer};
use tax_scrape::config::{AppConfig, ExportFormat, ExportType};
use tax_scrape::error::ConfigError;

fn tmp_file(name: &str, contents: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("tax_scrape_cfg_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p.push("config.yaml");
    fs::write(&p, contents).unwrap();
    p
}

#[test]
fn full_config_round_trips_into_an_analyzer() {
    let path = tmp_file("full", r#"
websites: ["https://acme.example/"]
tax_groups:
  tax_haven: ["Bermuda", "Cayman"]
  eu: ["Ireland"]
offshore_words: ["shell company", "trust"]
analysis:
  case: insensitive
  offshore_counting: per_sentence
crawl:
  max_pages: 20
  workers: 2
archive:
  from_year: 2015
  to_year: 2020
export:
  format: csv
  out: reports/run.csv
"#);

    let cfg = AppConfig::load(&path).unwrap();
    assert_eq!(cfg.websites, vec!["https://acme.example/"]);
    assert_eq!(cfg.tax_groups.keys().collect::<Vec<_>>(), vec!["eu", "tax_haven"]);
    assert_eq!(cfg.analysis.case, CaseMode::Insensitive);
    assert_eq!(cfg.analysis.offshore_counting, OffshoreCounting::PerSentence);
    assert_eq!(cfg.crawl.max_pages, 20);
    assert_eq!(cfg.crawl.request_pause_ms, tax_scrape::config::consts::REQUEST_PAUSE_MS);
    assert_eq!(cfg.archive.map(|a| a.years().count()), Some(6));
    assert_eq!(cfg.export.format, ExportFormat::Csv);
    assert_eq!(cfg.export.out_path(), PathBuf::from("reports/run.csv"));

    let a = SentenceCooccurrenceAnalyzer::new(cfg.analyzer_config().unwrap());
    let r = a.analyze("a TRUST in bermuda.");
    assert_eq!(r.group_counts["tax_haven"], 1);
    assert_eq!(r.term_counts["trust"], 1);
}

#[test]
fn missing_file_is_a_read_error() {
    let err = AppConfig::load("/definitely/not/here/config.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn missing_vocabulary_is_a_parse_error() {
    let path = tmp_file("no_terms", "tax_groups:\n  tax_haven: [Bermuda]\n");
    assert!(matches!(AppConfig::load(&path).unwrap_err(), ConfigError::Parse(_)));
}

#[test]
fn bad_values_are_invalid() {
    for (name, yaml) in [
        ("empty_country", "tax_groups:\n  tax_haven: [\"\"]\noffshore_words: [trust]\n"),
        ("ftp_site", "websites: [\"ftp://acme.example\"]\ntax_groups: {}\noffshore_words: []\n"),
        ("years", "tax_groups: {}\noffshore_words: []\narchive:\n  from_year: 2020\n  to_year: 2010\n"),
    ] {
        let path = tmp_file(name, yaml);
        assert!(matches!(AppConfig::load(&path).unwrap_err(), ConfigError::Invalid(_)), "{name}");
    }
}

#[test]
fn per_site_out_names_the_output_directory() {
    let path = tmp_file("per_site_out", r#"
tax_groups:
  tax_haven: ["Bermuda"]
offshore_words: ["trust"]
export:
  format: tsv
  export_type: per_site
  out: reports/sites
"#);
    let cfg = AppConfig::load(&path).unwrap();
    assert_eq!(cfg.export.export_type, ExportType::PerSite);
    assert_eq!(cfg.export.out_path(), PathBuf::from("reports/sites"));
}
