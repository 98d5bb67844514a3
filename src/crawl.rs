// src/crawl.rs
//
// Same-site traversal from a root URL. Breadth-first, each URL fetched once,
// bounded by `max_pages`. Failed fetches are logged and skipped; they never
// stop the crawl.

use std::collections::{HashSet, VecDeque};
use std::thread;
use std::time::Duration;

use url::Url;

use crate::core::html::{extract_links, extract_text, same_site};
use crate::core::PageSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages: usize,
    pub failures: usize,
}

impl CrawlStats {
    pub fn add(&mut self, other: CrawlStats) {
        self.pages += other.pages;
        self.failures += other.failures;
    }
}

pub struct Crawler<'a, P: PageSource + ?Sized> {
    source: &'a P,
    max_pages: usize,
    pause: Duration,
}

impl<'a, P: PageSource + ?Sized> Crawler<'a, P> {
    pub fn new(source: &'a P, max_pages: usize, pause: Duration) -> Self {
        Self { source, max_pages, pause }
    }

    /// Fetch pages reachable from `root` on the same site and hand each page's
    /// visible text to `on_page`.
    pub fn crawl<F>(&self, root: &Url, mut on_page: F) -> CrawlStats
    where
        F: FnMut(&Url, &str),
    {
        let mut stats = CrawlStats::default();
        let mut seen: HashSet<Url> = HashSet::new();
        let mut frontier: VecDeque<Url> = VecDeque::new();

        let mut start = root.clone();
        start.set_fragment(None);
        seen.insert(start.clone());
        frontier.push_back(start);

        let mut fetched = 0usize;
        while let Some(url) = frontier.pop_front() {
            if fetched >= self.max_pages {
                logd!("{root}: page limit {} reached, {} queued", self.max_pages, frontier.len() + 1);
                break;
            }
            if fetched > 0 && !self.pause.is_zero() {
                thread::sleep(self.pause); // be polite
            }
            fetched += 1;

            let html = match self.source.fetch(url.as_str()) {
                Ok(h) => h,
                Err(e) => {
                    logw!("{e}");
                    stats.failures += 1;
                    continue;
                }
            };
            stats.pages += 1;

            on_page(&url, &extract_text(&html));

            for link in extract_links(&html, &url) {
                if same_site(&link, root) && seen.insert(link.clone()) {
                    frontier.push_back(link);
                }
            }
        }
        stats
    }
}
