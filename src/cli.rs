// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{bail, WrapErr};

use crate::{
    analysis::{CaseMode, OffshoreCounting, SentenceCooccurrenceAnalyzer},
    config::{consts::DEFAULT_CONFIG, AppConfig, ArchiveOptions, ExportFormat, ExportType},
    core::Fetcher,
    export,
    progress::Progress,
    scrape::{self, RunSummary},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
    Tsv,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Tsv => ExportFormat::Tsv,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tax_scrape", version)]
#[command(about = "Count tax-haven country mentions and offshore vocabulary on company websites")]
pub struct Cli {
    /// YAML config with websites, tax_groups and offshore_words
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Output file, or directory with --per-site
    #[arg(short, long)]
    pub out: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// One output file per site
    #[arg(long)]
    pub per_site: bool,

    /// Header row for csv/tsv (true/false)
    #[arg(long, value_name = "BOOL")]
    pub include_headers: Option<bool>,

    /// Snapshot mode: first year of archived captures
    #[arg(long)]
    pub from_year: Option<i32>,

    /// Snapshot mode: last year of archived captures (inclusive)
    #[arg(long)]
    pub to_year: Option<i32>,

    #[arg(long)]
    pub workers: Option<usize>,

    /// Page limit per site when crawling
    #[arg(long)]
    pub max_pages: Option<usize>,

    #[arg(long)]
    pub case_insensitive: bool,

    /// Count each offshore term at most once per qualifying sentence
    #[arg(long)]
    pub offshore_per_sentence: bool,

    /// Print configured websites and exit
    #[arg(long)]
    pub list_sites: bool,

    /// Level for .store/debug.log (RUST_LOG wins when set)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Fold flags over the loaded config, then re-check it.
    pub fn apply(&self, cfg: &mut AppConfig) -> color_eyre::Result<()> {
        if self.per_site {
            cfg.export.export_type = ExportType::PerSite;
        }
        if let Some(f) = self.format {
            cfg.export.format = f.into();
        }
        if let Some(h) = self.include_headers {
            cfg.export.include_headers = h;
        }
        if let Some(out) = &self.out {
            cfg.export.set_path(out);
        }
        if let Some(w) = self.workers {
            cfg.crawl.workers = w;
        }
        if let Some(m) = self.max_pages {
            cfg.crawl.max_pages = m;
        }
        if self.case_insensitive {
            cfg.analysis.case = CaseMode::Insensitive;
        }
        if self.offshore_per_sentence {
            cfg.analysis.offshore_counting = OffshoreCounting::PerSentence;
        }

        cfg.archive = match (self.from_year, self.to_year, cfg.archive) {
            (None, None, current) => current,
            (Some(from_year), Some(to_year), _) => Some(ArchiveOptions { from_year, to_year }),
            (Some(from_year), None, Some(a)) => Some(ArchiveOptions { from_year, ..a }),
            (None, Some(to_year), Some(a)) => Some(ArchiveOptions { to_year, ..a }),
            _ => bail!("--from-year and --to-year go together unless the config has an archive section"),
        };

        cfg.validate().wrap_err("invalid settings after applying command-line flags")?;
        Ok(())
    }
}

/// Status lines on stderr, one per finished job.
#[derive(Default)]
struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Scraping {total} job(s)…");
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, label: &str, pages: usize) {
        self.done += 1;
        eprintln!("[{}/{}] {label}: {pages} page(s)", self.done, self.total);
    }

    fn item_failed(&mut self, label: &str, reason: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {label}: FAILED ({reason})", self.done, self.total);
    }
}

fn summary_line(s: &RunSummary, records: usize) -> String {
    format!(
        "{} job(s), {} failed; {} page(s) analyzed, {} fetch failure(s); {} record(s)",
        s.jobs, s.jobs_failed, s.pages, s.page_failures, records
    )
}

pub fn run() -> color_eyre::Result<()> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> color_eyre::Result<()> {
    crate::log::init(&cli.log_level);

    let mut cfg = AppConfig::load(&cli.config)
        .wrap_err_with(|| format!("loading {}", cli.config.display()))?;
    cli.apply(&mut cfg)?;

    if cli.list_sites {
        for site in &cfg.websites {
            println!("{site}");
        }
        return Ok(());
    }
    if cfg.websites.is_empty() {
        logw!("No websites configured in {}", cli.config.display());
    }

    let analyzer = SentenceCooccurrenceAnalyzer::new(cfg.analyzer_config()?);
    let fetcher = Fetcher::new(cfg.crawl.timeout_secs)?;

    let mut progress = CliProgress::default();
    let out = scrape::run(&fetcher, &analyzer, &cfg, Some(&mut progress));

    let paths = export::write_export(&cfg.export, &out.results)?;

    println!("{}", summary_line(&out.summary, out.results.len()));
    for p in &paths {
        println!("{}", p.display());
    }
    logf!("{}", summary_line(&out.summary, out.results.len()));
    Ok(())
}
