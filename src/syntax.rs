//! Line-level markdown syntax helpers shared by the lexer and the probes.

use crate::scan::is_space_or_tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeFenceHeader<'a> {
    pub fence_char: char,
    pub fence_len: usize,
    /// Entire info string (trimmed), excluding fence markers.
    pub info: &'a str,
    /// First token of `info`. `None` means "no language".
    pub language: Option<&'a str>,
}

fn strip_indent(line: &str) -> &str {
    let mut s = line;
    let mut spaces = 0usize;
    while spaces < 3 && s.starts_with(' ') {
        s = &s[1..];
        spaces += 1;
    }
    s
}

/// Fence opening line: up to 3 leading spaces, then 3+ backticks or tildes.
pub fn parse_code_fence_header(line: &str) -> Option<CodeFenceHeader<'_>> {
    let s = strip_indent(line);
    let bytes = s.as_bytes();
    if bytes.len() < 3 {
        return None;
    }
    let fence_char = bytes[0] as char;
    if fence_char != '`' && fence_char != '~' {
        return None;
    }
    let fence_len = bytes.iter().take_while(|b| **b == bytes[0]).count();
    if fence_len < 3 {
        return None;
    }
    let info = s[fence_len..].trim();
    // Backtick fences cannot carry backticks in their info string.
    if fence_char == '`' && info.contains('`') {
        return None;
    }
    Some(CodeFenceHeader {
        fence_char,
        fence_len,
        info,
        language: info.split_whitespace().next(),
    })
}

/// Closing line for a fence opened with `fence_len` of `fence_char`. Nothing else may follow.
pub fn is_code_fence_closing_line(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = strip_indent(line).trim_end();
    let mut count = 0usize;
    for ch in trimmed.chars() {
        if ch != fence_char {
            return false;
        }
        count += 1;
    }
    count >= fence_len
}

/// `^[\s]*[-*+][\s]+$`
pub fn is_list_marker_line_prefix(line: &str) -> bool {
    let bytes = line.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() && is_space_or_tab(bytes[i]) {
        i += 1;
    }
    if i >= bytes.len() || !matches!(bytes[i], b'-' | b'*' | b'+') {
        return false;
    }
    i += 1;
    i < bytes.len() && bytes[i..].iter().all(|b| is_space_or_tab(*b))
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub(crate) fn is_heading(line: &str) -> bool {
    let s = strip_indent(line);
    let hashes = s.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return false;
    }
    matches!(s.as_bytes().get(hashes), None | Some(b' ' | b'\t' | b'\n' | b'\r'))
}

fn repeated_marker(line: &str, markers: &[u8], min: usize) -> Option<u8> {
    let s = strip_indent(line).trim_end();
    let bytes = s.as_bytes();
    let first = *bytes.first()?;
    if !markers.contains(&first) {
        return None;
    }
    let mut count = 0usize;
    for &b in bytes {
        if b == first {
            count += 1;
        } else if !is_space_or_tab(b) {
            return None;
        }
    }
    (count >= min).then_some(first)
}

/// `---`, `***` or `___`, spaces allowed between markers.
pub(crate) fn thematic_break_char(line: &str) -> Option<u8> {
    repeated_marker(line, b"-*_", 3)
}

/// A setext underline: a run of `=` or `-`.
pub(crate) fn setext_underline_char(line: &str) -> Option<u8> {
    let s = strip_indent(line).trim_end();
    let bytes = s.as_bytes();
    let first = *bytes.first()?;
    if first != b'=' && first != b'-' {
        return None;
    }
    bytes.iter().all(|b| *b == first).then_some(first)
}

pub(crate) fn is_blockquote_start(line: &str) -> bool {
    strip_indent(line).starts_with('>')
}

pub(crate) fn is_list_item_start(line: &str) -> bool {
    let s = line.trim_start();
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    match bytes[0] {
        b'-' | b'+' | b'*' => is_space_or_tab(bytes[1]),
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            digits <= 9
                && matches!(bytes.get(digits), Some(b'.' | b')'))
                && bytes.get(digits + 1).is_some_and(|b| is_space_or_tab(*b))
        }
        _ => false,
    }
}

/// A nested list item or content indented by two spaces or a tab.
pub(crate) fn is_list_continuation(line: &str) -> bool {
    is_list_item_start(line) || line.starts_with('\t') || line.starts_with("  ")
}

/// GFM delimiter row: every `|`-separated cell is `:?-+:?`.
pub fn is_table_delimiter_row(line: &str) -> bool {
    let s = line.trim();
    if !s.contains('|') && !s.contains('-') {
        return false;
    }
    let s = s.strip_prefix('|').unwrap_or(s);
    let s = s.strip_suffix('|').unwrap_or(s);
    if s.trim().is_empty() {
        return false;
    }
    s.split('|').all(|cell| {
        let cell = cell.trim();
        let cell = cell.strip_prefix(':').unwrap_or(cell);
        let cell = cell.strip_suffix(':').unwrap_or(cell);
        !cell.is_empty() && cell.bytes().all(|b| b == b'-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_header_language() {
        let h = parse_code_fence_header("```rust title=\"x\"").unwrap();
        assert_eq!(h.fence_char, '`');
        assert_eq!(h.fence_len, 3);
        assert_eq!(h.language, Some("rust"));
        assert!(parse_code_fence_header("``inline``").is_none());
        assert!(parse_code_fence_header("    ```").is_none());
    }

    #[test]
    fn closing_lines() {
        assert!(is_code_fence_closing_line("````", '`', 3));
        assert!(!is_code_fence_closing_line("``", '`', 3));
        assert!(!is_code_fence_closing_line("~~~", '`', 3));
        assert!(!is_code_fence_closing_line("``` rust", '`', 3));
    }

    #[test]
    fn delimiter_rows() {
        assert!(is_table_delimiter_row("| --- | :---: |"));
        assert!(is_table_delimiter_row("---|---"));
        assert!(!is_table_delimiter_row("| a | b |"));
        assert!(!is_table_delimiter_row("||"));
    }

    #[test]
    fn headings_and_breaks() {
        assert!(is_heading("## Title"));
        assert!(!is_heading("#hashtag"));
        assert_eq!(thematic_break_char("* * *"), Some(b'*'));
        assert_eq!(thematic_break_char("--"), None);
        assert_eq!(setext_underline_char("==="), Some(b'='));
    }
}
