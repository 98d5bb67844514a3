// src/csv.rs
//
// Tabular view of an Accumulator: one row per (site, year).
// Columns: Site, Year, <groups…>, <terms…>, Countries found.

use std::io::{self, Write};

use crate::analysis::{Accumulator, AnalysisResult, TallyKey};

/// Joins found countries inside one cell.
pub const COUNTRY_SEP: &str = ";";

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

pub fn table_headers(acc: &Accumulator) -> Vec<String> {
    let mut h = vec!["Site".to_string(), "Year".to_string()];
    h.extend(acc.group_names().map(str::to_string));
    h.extend(acc.term_names().map(str::to_string));
    h.push("Countries found".to_string());
    h
}

/// Cells follow `table_headers` order; both walk the same sorted key sets.
pub fn table_row(key: &TallyKey, tally: &AnalysisResult) -> Vec<String> {
    let mut row = Vec::with_capacity(3 + tally.group_counts.len() + tally.term_counts.len());
    row.push(key.site.clone());
    row.push(key.year.map(|y| y.to_string()).unwrap_or_default());
    row.extend(tally.group_counts.values().map(u64::to_string));
    row.extend(tally.term_counts.values().map(u64::to_string));
    row.push(
        tally.countries_found.iter().map(String::as_str).collect::<Vec<_>>().join(COUNTRY_SEP),
    );
    row
}

/// Render rows (and optionally the header line) to a string.
pub fn to_export_string<'a, I>(headers: Option<&[String]>, rows: I, sep: char) -> String
where
    I: IntoIterator<Item = (&'a TallyKey, &'a AnalysisResult)>,
{
    let mut buf: Vec<u8> = Vec::new();

    // Writing into a Vec cannot fail.
    if let Some(h) = headers {
        let _ = write_row(&mut buf, h, sep);
    }
    for (key, tally) in rows {
        let _ = write_row(&mut buf, &table_row(key, tally), sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{MatchPolicy, SentenceCooccurrenceAnalyzer};

    #[test]
    fn quoting_follows_separator() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["a,b".into(), "say \"hi\"".into(), "plain".into()], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\"a,b\",\"say \"\"hi\"\"\",plain\n");

        let mut buf = Vec::new();
        write_row(&mut buf, &["a,b".into(), "c".into()], '\t').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,b\tc\n");
    }

    #[test]
    fn rows_line_up_with_headers() {
        let groups = [
            ("eu".to_string(), vec!["Ireland".to_string()]),
            ("tax_haven".to_string(), vec!["Bermuda".to_string(), "Cayman".to_string()]),
        ]
        .into_iter()
        .collect();
        let a = SentenceCooccurrenceAnalyzer::from_parts(groups, vec!["trust".into()], MatchPolicy::default())
            .unwrap();
        let mut acc = Accumulator::new(a.config());
        acc.record(&TallyKey::snapshot("https://acme.example/", 2019), &a.analyze("Cayman and Bermuda trust."));

        let h = table_headers(&acc);
        assert_eq!(h, vec!["Site", "Year", "eu", "tax_haven", "trust", "Countries found"]);

        let s = to_export_string(Some(&h), acc.iter(), ',');
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[1], "https://acme.example/,2019,0,2,2,Bermuda;Cayman");
    }
}
