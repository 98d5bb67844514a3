// tests/export_e2e.rs
use std::fs;
use std::path::PathBuf;

use tax_scrape::analysis::{Accumulator, MatchPolicy, SentenceCooccurrenceAnalyzer, TallyKey};
use tax_scrape::config::{ExportFormat, ExportOptions, ExportType};
use tax_scrape::export::write_export;

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("tax_scrape_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn filled() -> Accumulator {
    let groups = [
        ("eu".to_string(), vec!["Ireland".to_string()]),
        ("tax_haven".to_string(), vec!["Bermuda".to_string(), "Jersey".to_string()]),
    ]
    .into_iter()
    .collect();
    let a = SentenceCooccurrenceAnalyzer::from_parts(groups, vec!["holding company".into()], MatchPolicy::default())
        .unwrap();
    let mut acc = Accumulator::new(a.config());
    acc.record(&TallyKey::site("https://acme.example/"), &a.analyze("A holding company in Bermuda and Jersey."));
    acc.record(&TallyKey::site("https://beta.example/ir"), &a.analyze("Offices in Ireland."));
    acc.touch(&TallyKey::site("https://quiet.example/"));
    acc
}

#[test]
fn single_json_file_keeps_user_extension() {
    let dir = tmp_dir("json_ext");
    let mut opts = ExportOptions::default();
    opts.set_path(dir.join("report.txt").to_str().unwrap());
    opts.format = ExportFormat::Json;

    let written = write_export(&opts, &filled()).unwrap();
    assert_eq!(written, vec![dir.join("report.txt")]);

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    let acme = &v["https://acme.example/"];
    assert_eq!(acme["country_counts"]["tax_haven"], 2);
    assert_eq!(acme["country_counts"]["eu"], 0);
    assert_eq!(acme["offshore_mentions"]["holding company"], 2);
    assert_eq!(acme["countries_found"], serde_json::json!(["Bermuda", "Jersey"]));
    assert_eq!(v["https://quiet.example/"]["countries_found"], serde_json::json!([]));
}

#[test]
fn single_csv_file_has_header_and_one_row_per_site() {
    let dir = tmp_dir("csv_single");
    let mut opts = ExportOptions::default();
    opts.format = ExportFormat::Csv;
    opts.set_path(dir.join("results").to_str().unwrap());

    let written = write_export(&opts, &filled()).unwrap();
    assert_eq!(written, vec![dir.join("results.csv")]);

    let content = fs::read_to_string(&written[0]).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec![
        "Site,Year,eu,tax_haven,holding company,Countries found",
        "https://acme.example/,,0,2,2,Bermuda;Jersey",
        "https://beta.example/ir,,1,0,0,Ireland",
        "https://quiet.example/,,0,0,0,",
    ]);
}

#[test]
fn per_site_tsv_writes_one_file_each() {
    let dir = tmp_dir("tsv_per_site");
    let mut opts = ExportOptions::default();
    opts.export_type = ExportType::PerSite;
    opts.format = ExportFormat::Tsv;
    opts.include_headers = false;
    opts.set_path(dir.to_str().unwrap());

    let written = write_export(&opts, &filled()).unwrap();
    assert_eq!(written, vec![
        dir.join("acme.example.tsv"),
        dir.join("beta.example_ir.tsv"),
        dir.join("quiet.example.tsv"),
    ]);
    assert_eq!(
        fs::read_to_string(&written[1]).unwrap(),
        "https://beta.example/ir\t\t1\t0\t0\tIreland\n"
    );
}

#[test]
fn per_site_into_a_file_path_fails() {
    let dir = tmp_dir("not_a_dir");
    let blocker = dir.join("taken");
    fs::write(&blocker, "x").unwrap();

    let mut opts = ExportOptions::default();
    opts.export_type = ExportType::PerSite;
    opts.set_path(blocker.to_str().unwrap());
    assert!(write_export(&opts, &filled()).is_err());
}
