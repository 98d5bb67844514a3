// src/core/sanitize.rs

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// File stem for a site URL: `https://www.acme.example/ir` -> `www.acme.example_ir`.
/// Falls back to `site_<n>` when nothing usable is left.
pub fn sanitize_site_filename(site: &str, n: usize) -> String {
    let bare = site
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');

    let mut out = String::with_capacity(bare.len());
    let mut last_us = false;
    for ch in bare.chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
            out.push(ch);
            last_us = false;
        } else if !last_us {
            out.push('_');
            last_us = true;
        }
    }
    let out = out.trim_matches(|c| c == '_' || c == '.').to_string();
    if out.is_empty() { format!("site_{n}") } else { out }
}
