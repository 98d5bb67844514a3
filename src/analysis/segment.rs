// src/analysis/segment.rs
//
// Sentence segmentation. Heuristic only: under-splits on uncommon
// abbreviations ("approx. 5") and over-splits on some others ("Inc. Ltd.").
// Both are accepted behaviour, not bugs.

/// Splits text into sentence-like slices.
///
/// Implementations must return slices borrowed from `text`, in order.
/// The analyzer only needs substring tests on each slice, so a segmenter
/// is free to drop separators.
pub trait Segmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Default boundary rule.
///
/// A boundary is a whitespace character directly after `.`, `?` or `!`.
/// The whitespace character itself is dropped. No boundary is taken when the
/// punctuation closes one of:
/// - `w.w<punct>`: dotted abbreviations such as `U.S.` or `e.g.`
/// - `<Upper>.` with no word character before the letter: initials (`J. Smith`)
/// - `<Upper><lower>.`: short titles (`Mr.`, `Dr.`, `St.`)
///
/// Always yields at least one slice (the whole text when nothing splits).
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicSegmenter;

impl Segmenter for HeuristicSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut out = Vec::new();
        let mut start = 0usize;

        for i in 1..chars.len() {
            let (at, ch) = chars[i];
            if !ch.is_whitespace() || !is_terminal(chars[i - 1].1) {
                continue;
            }
            if guarded(&chars, i) {
                continue;
            }
            out.push(&text[start..at]);
            start = at + ch.len_utf8();
        }
        out.push(&text[start..]);
        out
    }
}

#[inline]
fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '?' | '!')
}

#[inline]
fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `i` indexes the whitespace after terminal punctuation at `i - 1`.
fn guarded(chars: &[(usize, char)], i: usize) -> bool {
    let at = |k: usize| chars[i - k].1;

    // U.S.  e.g.  i.e?
    if i >= 4 && is_word(at(4)) && at(3) == '.' && is_word(at(2)) {
        return true;
    }
    if at(1) != '.' || i < 2 {
        return false;
    }
    // J. Smith
    if at(2).is_uppercase() && (i == 2 || !is_word(at(3))) {
        return true;
    }
    // Mr. Dr.
    i >= 3 && at(3).is_uppercase() && at(2).is_lowercase()
}
