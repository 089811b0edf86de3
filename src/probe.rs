//! Cheap checks on a block to tell whether it is still being written.

use crate::syntax::{is_code_fence_closing_line, is_table_delimiter_row, parse_code_fence_header};

/// A fence is open at the end of `text`.
///
/// Unlike the toggle used during completion, this follows fence rules: a fence closes only with
/// the same character, at least as many of them, and nothing else on the line.
pub fn has_incomplete_code_fence(text: &str) -> bool {
    let mut open: Option<(char, usize)> = None;
    for line in text.lines() {
        match open {
            Some((ch, len)) => {
                if is_code_fence_closing_line(line, ch, len) {
                    open = None;
                }
            }
            None => {
                if let Some(header) = parse_code_fence_header(line) {
                    open = Some((header.fence_char, header.fence_len));
                }
            }
        }
    }
    open.is_some()
}

/// `text` contains a GFM table delimiter row such as `| --- | :-: |`.
pub fn has_table(text: &str) -> bool {
    text.lines()
        .any(|line| line.contains('|') && is_table_delimiter_row(line))
}

/// Which probes count toward [`is_incomplete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncompleteCheck {
    /// Treat any table as still in progress (rows may keep arriving).
    pub tables: bool,
}

impl Default for IncompleteCheck {
    fn default() -> Self {
        Self { tables: true }
    }
}

pub fn is_incomplete(block: &str, check: IncompleteCheck) -> bool {
    has_incomplete_code_fence(block) || (check.tables && has_table(block))
}
