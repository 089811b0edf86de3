//! Marker counters. Each is a single forward scan that ignores code.

use crate::scan::{
    CodeMask, MathMask, is_list_marker_at, is_within_html_tag, is_within_link_or_image_url,
    is_word_char, neighbours,
};

fn word_internal(prev: Option<char>, next: Option<char>) -> bool {
    matches!((prev, next), (Some(p), Some(n)) if is_word_char(p) && is_word_char(n))
}

fn whitespace_flanked(prev: Option<char>, next: Option<char>) -> bool {
    matches!((prev, next), (Some(p), Some(n)) if p.is_whitespace() && n.is_whitespace())
}

/// Shared context for the single-marker exclusion rules of one text.
pub(crate) struct MarkerScan<'a> {
    pub(crate) text: &'a str,
    pub(crate) code: CodeMask,
    math: MathMask,
}

impl<'a> MarkerScan<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            code: CodeMask::new(text),
            math: MathMask::new(text),
        }
    }

    /// Whether the `*` at `i` is excluded from single-asterisk counting.
    pub(crate) fn skip_asterisk(&self, i: usize) -> bool {
        let bytes = self.text.as_bytes();
        let (prev, next) = neighbours(self.text, i);
        if prev == Some('\\') || self.code.in_code(i) || self.math.contains(i) {
            return true;
        }
        // The first `*` of a run of exactly three counts as a single; of any other run it does not.
        if prev != Some('*') && next == Some('*') {
            let triple = bytes.get(i + 2) == Some(&b'*') && bytes.get(i + 3) != Some(&b'*');
            return !triple;
        }
        if prev == Some('*') {
            return true;
        }
        word_internal(prev, next) || whitespace_flanked(prev, next) || is_list_marker_at(self.text, i)
    }

    /// Whether the `_` at `i` is excluded from single-underscore counting.
    pub(crate) fn skip_underscore(&self, i: usize) -> bool {
        let (prev, next) = neighbours(self.text, i);
        prev == Some('\\')
            || self.code.in_code(i)
            || self.math.contains(i)
            || prev == Some('_')
            || next == Some('_')
            || word_internal(prev, next)
            || whitespace_flanked(prev, next)
            || is_within_link_or_image_url(self.text, i)
            || is_within_html_tag(self.text, i)
    }

    /// First `*` that could open a single-asterisk italic: not in a run, not excluded.
    pub(crate) fn first_single_asterisk(&self) -> Option<usize> {
        let bytes = self.text.as_bytes();
        (0..bytes.len()).find(|&i| {
            if bytes[i] != b'*' {
                return false;
            }
            let (prev, next) = neighbours(self.text, i);
            prev != Some('*') && next != Some('*') && !self.skip_asterisk(i)
        })
    }

    pub(crate) fn first_single_underscore(&self) -> Option<usize> {
        let bytes = self.text.as_bytes();
        (0..bytes.len()).find(|&i| bytes[i] == b'_' && !self.skip_underscore(i))
    }

    pub(crate) fn single_asterisks(&self) -> usize {
        self.text
            .bytes()
            .enumerate()
            .filter(|&(i, b)| b == b'*' && !self.skip_asterisk(i))
            .count()
    }

    pub(crate) fn single_underscores(&self) -> usize {
        self.text
            .bytes()
            .enumerate()
            .filter(|&(i, b)| b == b'_' && !self.skip_underscore(i))
            .count()
    }
}

pub fn count_single_asterisks(text: &str) -> usize {
    MarkerScan::new(text).single_asterisks()
}

pub fn count_single_underscores(text: &str) -> usize {
    MarkerScan::new(text).single_underscores()
}

/// Non-overlapping `marker marker` pairs, left to right, whose first byte is outside code.
pub fn count_double(text: &str, code: &CodeMask, marker: u8) -> usize {
    count_double_where(text, marker, |i| code.in_code(i))
}

/// As [`count_double`], but only fenced code is skipped.
pub fn count_double_outside_fences(text: &str, code: &CodeMask, marker: u8) -> usize {
    count_double_where(text, marker, |i| code.in_fence(i))
}

fn count_double_where(text: &str, marker: u8, skip: impl Fn(usize) -> bool) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0usize;
    let mut i = 0usize;
    while i + 1 < bytes.len() {
        if bytes[i] == marker && bytes[i + 1] == marker {
            if !skip(i) {
                count += 1;
            }
            i += 2;
            continue;
        }
        i += 1;
    }
    count
}

/// Sum of `run / 3` over every `*` run outside code.
pub fn count_triple_asterisks(text: &str, code: &CodeMask) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'*' {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i] == b'*' {
            i += 1;
        }
        if !code.in_code(start) {
            count += (i - start) / 3;
        }
    }
    count
}

/// Escaped `\$$` and code are skipped.
pub fn count_double_dollars(text: &str, code: &CodeMask) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0usize;
    let mut i = 0usize;
    while i + 1 < bytes.len() {
        if bytes[i] == b'$' && bytes[i + 1] == b'$' {
            let escaped = i > 0 && bytes[i - 1] == b'\\';
            if !escaped && !code.in_code(i) {
                count += 1;
            }
            i += 2;
            continue;
        }
        i += 1;
    }
    count
}
