//! Block segmentation: split (completed) text into top-level units that can be rendered and
//! memoized independently.
//!
//! Constructs the lexer cannot see across blank lines are merged back together here: HTML
//! elements that stay open over several tokens, and display math whose `$$` fences are split.

mod html;
mod lexer;

use tracing::trace;

pub use lexer::{Lexer, LineLexer};

use crate::types::BlockKind;

/// Split `text` into blocks using the default [`LineLexer`].
///
/// Concatenating the result reproduces `text` exactly.
pub fn segment(text: &str) -> Vec<&str> {
    segment_with(text, &LineLexer)
}

/// Split `text` into blocks using a custom lexer.
pub fn segment_with<'a, L: Lexer + ?Sized>(text: &'a str, lexer: &L) -> Vec<&'a str> {
    if text.is_empty() {
        return Vec::new();
    }
    // Footnote references resolve against definitions anywhere in the document.
    if has_footnotes(text) {
        trace!("footnotes present; keeping text as a single block");
        return vec![text];
    }

    let mut blocks: Vec<(usize, usize)> = Vec::new();
    let mut html_stack: Vec<String> = Vec::new();
    let mut prev_was_code = false;
    let mut cursor = 0usize;

    for token in lexer.lex(text) {
        let start = cursor;
        let end = start + token.raw.len();
        cursor = end;
        debug_assert_eq!(&text[start..end], token.raw, "lexer tokens must tile the input");

        if !html_stack.is_empty() && !blocks.is_empty() {
            extend_last(&mut blocks, end);
            if token.kind == BlockKind::Html {
                html::track_tags(token.raw, &mut html_stack);
            }
            trace!(depth = html_stack.len(), "merged token into open html block");
        } else if token.kind == BlockKind::Html {
            if let Some((name, depth)) = html::unclosed_opening(token.raw) {
                trace!(tag = %name, depth, "html block left open");
                html_stack.extend(std::iter::repeat_n(name, depth));
            }
            blocks.push((start, end));
        } else if !prev_was_code
            && blocks
                .last()
                .is_some_and(|&(s, e)| display_math_fences(&text[s..e]) % 2 == 1)
        {
            extend_last(&mut blocks, end);
            trace!("merged token into open display math block");
        } else {
            blocks.push((start, end));
        }

        if token.kind != BlockKind::Space {
            prev_was_code = token.kind == BlockKind::CodeFence;
        }
    }

    blocks.into_iter().map(|(s, e)| &text[s..e]).collect()
}

fn extend_last(blocks: &mut [(usize, usize)], end: usize) {
    if let Some(last) = blocks.last_mut() {
        last.1 = end;
    }
}

/// `$$` count with escaped `\$$` skipped.
fn display_math_fences(block: &str) -> usize {
    let bytes = block.as_bytes();
    let mut count = 0usize;
    let mut i = 0usize;
    while i + 1 < bytes.len() {
        if bytes[i] == b'$' && bytes[i + 1] == b'$' {
            if i == 0 || bytes[i - 1] != b'\\' {
                count += 1;
            }
            i += 2;
            continue;
        }
        i += 1;
    }
    count
}

/// `[^id]` or `[^id]:` with a non-empty id of ASCII alphanumerics, `_` or `-`.
pub fn has_footnotes(text: &str) -> bool {
    const MAX_ID_LEN: usize = 200;
    let bytes = text.as_bytes();
    let mut i = 0usize;
    while i + 2 < bytes.len() {
        if bytes[i] == b'[' && bytes[i + 1] == b'^' {
            let id_len = bytes[i + 2..]
                .iter()
                .take(MAX_ID_LEN + 1)
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_' || **b == b'-')
                .count();
            if id_len > 0 && id_len <= MAX_ID_LEN && bytes.get(i + 2 + id_len) == Some(&b']') {
                return true;
            }
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footnote_ids() {
        assert!(has_footnotes("see [^1]"));
        assert!(has_footnotes("[^note-a]: body"));
        assert!(!has_footnotes("[^]"));
        assert!(!has_footnotes("[^has space]"));
        assert!(!has_footnotes(&format!("[^{}]", "a".repeat(201))));
    }

    #[test]
    fn display_math_counts_skip_escapes() {
        assert_eq!(display_math_fences("$$\nx\n"), 1);
        assert_eq!(display_math_fences("\\$$ $$a$$"), 2);
    }
}
