// src/progress.rs
/// Progress reporting for a scrape run. The CLI implements this to print
/// status lines; library callers that need no reporting pass `None`.
pub trait Progress {
    /// Called at the start with the number of jobs.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One job (a site crawl or a snapshot) finished.
    fn item_done(&mut self, _label: &str, _pages: usize) {}

    /// One job produced nothing usable.
    fn item_failed(&mut self, _label: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
