// src/scrape.rs
//
// Plan jobs (one crawl per site, or one job per archived capture), run them on
// a small worker pool, and fold results into an Accumulator.
//
// Workers only read shared state (page source, analyzer). Results travel over
// a channel to the calling thread, which is the single writer of the totals.

use std::sync::{atomic::{AtomicUsize, Ordering}, mpsc};
use std::thread;
use std::time::Duration;

use url::Url;

use crate::{
    analysis::{Accumulator, AnalysisResult, Segmenter, SentenceCooccurrenceAnalyzer, TallyKey},
    archive::{self, Snapshot},
    config::{consts::JITTER_MS, AppConfig},
    core::{html::extract_text, PageSource},
    crawl::{CrawlStats, Crawler},
    progress::Progress,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Job {
    /// Live site, crawled from its root.
    Crawl { site: String, root: Url },
    /// One archived capture of a site's root page.
    Snapshot { site: String, snapshot: Snapshot },
}

impl Job {
    pub fn key(&self) -> TallyKey {
        match self {
            Job::Crawl { site, .. } => TallyKey::site(site.clone()),
            Job::Snapshot { site, snapshot } => TallyKey::snapshot(site.clone(), snapshot.year),
        }
    }

    pub fn label(&self) -> String {
        self.key().to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub jobs: usize,
    /// Jobs (or snapshot listings) that yielded no page at all.
    pub jobs_failed: usize,
    pub pages: usize,
    pub page_failures: usize,
}

#[derive(Clone, Debug)]
pub struct ScrapeOutput {
    pub results: Accumulator,
    pub summary: RunSummary,
}

/// Jobs for every configured site. In snapshot mode this queries the archive
/// index; sites whose listing fails are logged and skipped. Progress only gets
/// `log` lines here, since `begin` has not been called yet.
pub fn plan_jobs<P: PageSource + ?Sized>(
    source: &P,
    config: &AppConfig,
    mut progress: Option<&mut dyn Progress>,
) -> (Vec<Job>, usize) {
    let mut jobs = Vec::new();
    let mut failed = 0usize;

    for site in &config.websites {
        let root = match Url::parse(site) {
            Ok(u) => u,
            Err(e) => {
                loge!("Skipping {site}: {e}");
                failed += 1;
                continue;
            }
        };
        match &config.archive {
            None => jobs.push(Job::Crawl { site: site.clone(), root }),
            Some(years) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Listing captures for {site}…"));
                }
                match archive::list_snapshots(source, site, years) {
                    Ok(snaps) => {
                        if snaps.is_empty() {
                            logw!("{site}: no captures in {}..={}", years.from_year, years.to_year);
                        }
                        jobs.extend(snaps.into_iter().map(|snapshot| Job::Snapshot {
                            site: site.clone(),
                            snapshot,
                        }));
                    }
                    Err(e) => {
                        loge!("{e}");
                        if let Some(p) = progress.as_deref_mut() {
                            p.log(&format!("{site}: no captures listed ({e})"));
                        }
                        failed += 1;
                    }
                }
            }
        }
    }
    (jobs, failed)
}

/// Run one job to completion on the current thread.
fn run_job<P, S>(
    source: &P,
    analyzer: &SentenceCooccurrenceAnalyzer<S>,
    config: &AppConfig,
    job: &Job,
) -> (AnalysisResult, CrawlStats)
where
    P: PageSource + ?Sized,
    S: Segmenter,
{
    let mut tally = AnalysisResult::zeroed(analyzer.config());
    let stats = match job {
        Job::Crawl { root, .. } => {
            let pause = Duration::from_millis(config.crawl.request_pause_ms);
            let crawler = Crawler::new(source, config.crawl.max_pages, pause);
            crawler.crawl(root, |url, text| {
                let r = analyzer.analyze(text);
                logd!("{url}: {} country / {} offshore mentions", r.group_total(), r.term_total());
                tally.absorb(&r);
            })
        }
        Job::Snapshot { snapshot, .. } => match source.fetch(&snapshot.capture_url()) {
            Ok(html) => {
                tally.absorb(&analyzer.analyze(&extract_text(&html)));
                CrawlStats { pages: 1, failures: 0 }
            }
            Err(e) => {
                logw!("{e}");
                CrawlStats { pages: 0, failures: 1 }
            }
        },
    };
    (tally, stats)
}

/// Run all jobs with `config.crawl.workers` threads.
pub fn run_jobs<P, S>(
    source: &P,
    analyzer: &SentenceCooccurrenceAnalyzer<S>,
    config: &AppConfig,
    jobs: &[Job],
    mut progress: Option<&mut dyn Progress>,
) -> ScrapeOutput
where
    P: PageSource + ?Sized,
    S: Segmenter + Sync,
{
    let mut results = Accumulator::new(analyzer.config());
    let mut summary = RunSummary { jobs: jobs.len(), ..Default::default() };

    if let Some(p) = progress.as_deref_mut() {
        p.begin(jobs.len());
    }

    let workers = config.crawl.workers.min(jobs.len()).max(1);
    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, AnalysisResult, CrawlStats)>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            scope.spawn(move || {
                let mut first = true;
                loop {
                    let i = next.fetch_add(1, Ordering::Relaxed);
                    if i >= jobs.len() {
                        break;
                    }
                    // Pause between jobs, never after the last one.
                    if !first {
                        let jitter = (i as u64) % JITTER_MS;
                        thread::sleep(Duration::from_millis(config.crawl.request_pause_ms + jitter));
                    }
                    first = false;
                    let (tally, stats) = run_job(source, analyzer, config, &jobs[i]);
                    if tx.send((i, tally, stats)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx); // receiver below is the sole consumer

        for (i, tally, stats) in rx {
            let job = &jobs[i];
            let label = job.label();
            summary.pages += stats.pages;
            summary.page_failures += stats.failures;

            if stats.pages == 0 {
                summary.jobs_failed += 1;
                loge!("{label}: no page could be fetched");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&label, "no page could be fetched");
                }
                continue;
            }

            results.record(&job.key(), &tally);
            logf!("{label}: {} pages, {} country / {} offshore mentions",
                stats.pages, tally.group_total(), tally.term_total());
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(&label, stats.pages);
            }
        }
    });

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    ScrapeOutput { results, summary }
}

/// Plan and run everything the config asks for.
pub fn run<P, S>(
    source: &P,
    analyzer: &SentenceCooccurrenceAnalyzer<S>,
    config: &AppConfig,
    mut progress: Option<&mut dyn Progress>,
) -> ScrapeOutput
where
    P: PageSource + ?Sized,
    S: Segmenter + Sync,
{
    let (jobs, planning_failures) =
        plan_jobs(source, config, progress.as_mut().map(|p| &mut **p as &mut dyn Progress));
    let mut out = run_jobs(source, analyzer, config, &jobs, progress);
    out.summary.jobs_failed += planning_failures;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::error::FetchError;

    struct Pages(HashMap<String, String>);

    impl PageSource for Pages {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if url.starts_with(crate::config::consts::CDX_ENDPOINT) {
                let q = Url::parse(url).unwrap();
                let (_, site) = q.query_pairs().find(|(k, _)| k == "url").unwrap();
                if site.contains("nolist") {
                    return Err(FetchError::Status { url: url.to_string(), status: 503 });
                }
                return Ok(format!(
                    r#"[["timestamp","original"],["20160101000000","{site}"],["20180101000000","{site}"]]"#
                ));
            }
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status { url: url.to_string(), status: 404 })
        }
    }

    fn config(yaml_tail: &str) -> AppConfig {
        let yaml = format!(
            "websites: [\"https://acme.example/\", \"https://down.example/\"]\n\
             tax_groups:\n  tax_haven: [Bermuda, Cayman]\n  eu: [Ireland]\n\
             offshore_words: [subsidiary]\n\
             crawl:\n  workers: 3\n  request_pause_ms: 0\n{yaml_tail}"
        );
        AppConfig::from_yaml_str(&yaml).unwrap()
    }

    fn pages() -> Pages {
        Pages(HashMap::from([
            ("https://acme.example/".to_string(),
             r#"<p>Our subsidiary in Bermuda.</p><a href="/ir">ir</a>"#.to_string()),
            ("https://acme.example/ir".to_string(),
             "<p>Ireland and Cayman host a subsidiary.</p>".to_string()),
            ("https://web.archive.org/web/20160101000000id_/https://acme.example/".to_string(),
             "<p>Cayman.</p>".to_string()),
        ]))
    }

    #[test]
    fn crawl_mode_aggregates_per_site() {
        let cfg = config("");
        let analyzer = SentenceCooccurrenceAnalyzer::new(cfg.analyzer_config().unwrap());
        let out = run(&pages(), &analyzer, &cfg, None);

        assert_eq!(out.summary, RunSummary { jobs: 2, jobs_failed: 1, pages: 2, page_failures: 1 });
        assert_eq!(out.results.len(), 1);
        let t = out.results.get(&TallyKey::site("https://acme.example/")).unwrap();
        assert_eq!(t.group_counts["tax_haven"], 2);
        assert_eq!(t.group_counts["eu"], 1);
        // 1 (Bermuda sentence) + 2 (Ireland and Cayman in one sentence)
        assert_eq!(t.term_counts["subsidiary"], 3);
        assert_eq!(t.countries_found.len(), 3);
    }

    #[test]
    fn snapshot_mode_keys_by_year() {
        let cfg = config("archive:\n  from_year: 2015\n  to_year: 2019\n");
        let analyzer = SentenceCooccurrenceAnalyzer::new(cfg.analyzer_config().unwrap());
        let out = run(&pages(), &analyzer, &cfg, None);

        // 2 sites x 2 captures; only acme 2016 resolves.
        assert_eq!(out.summary.jobs, 4);
        assert_eq!(out.summary.jobs_failed, 3);
        let t = out.results.get(&TallyKey::snapshot("https://acme.example/", 2016)).unwrap();
        assert_eq!(t.group_counts["tax_haven"], 1);
        assert!(out.results.get(&TallyKey::snapshot("https://acme.example/", 2018)).is_none());
    }

    /// Records the order of progress calls.
    #[derive(Default)]
    struct Events(Vec<String>);

    impl Progress for Events {
        fn begin(&mut self, total: usize) { self.0.push(format!("begin {total}")); }
        fn log(&mut self, _msg: &str) { self.0.push("log".into()); }
        fn item_done(&mut self, label: &str, _pages: usize) { self.0.push(format!("done {label}")); }
        fn item_failed(&mut self, label: &str, _reason: &str) { self.0.push(format!("failed {label}")); }
        fn finish(&mut self) { self.0.push("finish".into()); }
    }

    #[test]
    fn failed_listing_is_reported_before_begin_only_as_a_log_line() {
        let mut cfg = config("archive:\n  from_year: 2015\n  to_year: 2019\n");
        cfg.websites = vec!["https://nolist.example/".into(), "https://acme.example/".into()];
        let analyzer = SentenceCooccurrenceAnalyzer::new(cfg.analyzer_config().unwrap());
        let mut events = Events::default();
        let out = run(&pages(), &analyzer, &cfg, Some(&mut events));

        let begin = events.0.iter().position(|e| e == "begin 2").unwrap();
        assert!(events.0[..begin].iter().all(|e| e == "log"));
        assert_eq!(events.0.iter().filter(|e| e.starts_with("failed")).count(), 1);
        assert_eq!(events.0.last().map(String::as_str), Some("finish"));
        // nolist listing + acme 2018 capture
        assert_eq!(out.summary.jobs_failed, 2);
        assert_eq!(out.results.len(), 1);
    }

    #[test]
    fn workers_do_not_pause_after_their_last_job() {
        let mut cfg = config("");
        cfg.websites = vec!["https://gone.example/".into()];
        cfg.crawl.request_pause_ms = 5_000;
        let analyzer = SentenceCooccurrenceAnalyzer::new(cfg.analyzer_config().unwrap());

        let started = std::time::Instant::now();
        let out = run(&pages(), &analyzer, &cfg, None);
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(out.summary.jobs_failed, 1);
    }

    #[test]
    fn no_sites_is_an_empty_run() {
        let mut cfg = config("");
        cfg.websites.clear();
        let analyzer = SentenceCooccurrenceAnalyzer::new(cfg.analyzer_config().unwrap());
        let out = run(&pages(), &analyzer, &cfg, None);
        assert!(out.results.is_empty());
        assert_eq!(out.summary, RunSummary::default());
    }
}
