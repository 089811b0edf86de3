use super::html::is_html_block_start;
use crate::syntax::{
    is_blank, is_blockquote_start, is_code_fence_closing_line, is_heading, is_list_continuation,
    is_list_item_start, is_table_delimiter_row, parse_code_fence_header, setext_underline_char,
    thematic_break_char,
};
use crate::types::{BlockKind, Token};

/// Splits text into top-level tokens that tile the input exactly.
pub trait Lexer {
    fn lex<'a>(&self, text: &'a str) -> Vec<Token<'a>>;
}

/// Line-oriented CommonMark-style lexer. It only finds block boundaries and never builds a tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineLexer;

struct Lines<'a> {
    text: &'a str,
    /// Byte offset of each line start.
    starts: Vec<usize>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(i, b)| b == b'\n' && i + 1 < text.len())
                .map(|(i, _)| i + 1),
        );
        if text.is_empty() {
            starts.clear();
        }
        Self { text, starts }
    }

    fn len(&self) -> usize {
        self.starts.len()
    }

    fn offset(&self, i: usize) -> usize {
        self.starts.get(i).copied().unwrap_or(self.text.len())
    }

    /// Line `i` without its line ending.
    fn get(&self, i: usize) -> &'a str {
        self.text[self.offset(i)..self.offset(i + 1)].trim_end_matches(['\n', '\r'])
    }

    fn blank(&self, i: usize) -> bool {
        is_blank(self.get(i))
    }

    fn skip_blank(&self, mut i: usize) -> usize {
        while i < self.len() && self.blank(i) {
            i += 1;
        }
        i
    }
}

fn is_fence_start(line: &str) -> bool {
    parse_code_fence_header(line).is_some()
}

/// Starts that end a paragraph without a blank line.
fn interrupts_paragraph(line: &str) -> bool {
    is_heading(line)
        || thematic_break_char(line).is_some()
        || is_fence_start(line)
        || is_blockquote_start(line)
        || is_list_item_start(line)
        || is_html_block_start(line)
}

fn starts_table(lines: &Lines<'_>, i: usize) -> bool {
    i + 1 < lines.len() && lines.get(i).contains('|') && is_table_delimiter_row(lines.get(i + 1))
}

impl LineLexer {
    /// Kind of the block starting at line `i` and the index of the first line after it.
    fn block_at(&self, lines: &Lines<'_>, i: usize) -> (BlockKind, usize) {
        let n = lines.len();
        let line = lines.get(i);

        if is_blank(line) {
            return (BlockKind::Space, lines.skip_blank(i));
        }
        if let Some(header) = parse_code_fence_header(line) {
            let mut j = i + 1;
            while j < n {
                let closing =
                    is_code_fence_closing_line(lines.get(j), header.fence_char, header.fence_len);
                j += 1;
                if closing {
                    break;
                }
            }
            return (BlockKind::CodeFence, j);
        }
        if is_heading(line) {
            return (BlockKind::Heading, i + 1);
        }
        if thematic_break_char(line).is_some() {
            return (BlockKind::ThematicBreak, i + 1);
        }
        if is_html_block_start(line) {
            let mut j = i + 1;
            while j < n && !lines.blank(j) {
                j += 1;
            }
            return (BlockKind::Html, j);
        }
        if is_blockquote_start(line) {
            return (BlockKind::BlockQuote, self.blockquote_end(lines, i + 1));
        }
        if is_list_item_start(line) {
            return (BlockKind::List, self.list_end(lines, i + 1));
        }
        if starts_table(lines, i) {
            let mut j = i + 2;
            while j < n && !lines.blank(j) && !interrupts_paragraph(lines.get(j)) {
                j += 1;
            }
            return (BlockKind::Table, j);
        }

        let mut j = i + 1;
        while j < n {
            let next = lines.get(j);
            if is_blank(next) {
                break;
            }
            if setext_underline_char(next).is_some() {
                return (BlockKind::Heading, j + 1);
            }
            if interrupts_paragraph(next) || starts_table(lines, j) {
                break;
            }
            j += 1;
        }
        (BlockKind::Paragraph, j)
    }

    /// Quotes continue over lazy lines, and over blank lines when the next line is quoted again.
    fn blockquote_end(&self, lines: &Lines<'_>, mut j: usize) -> usize {
        let n = lines.len();
        loop {
            while j < n && !lines.blank(j) {
                let next = lines.get(j);
                if !is_blockquote_start(next)
                    && (is_heading(next) || is_fence_start(next) || thematic_break_char(next).is_some())
                {
                    return j;
                }
                j += 1;
            }
            let after = lines.skip_blank(j);
            if after < n && is_blockquote_start(lines.get(after)) {
                j = after;
                continue;
            }
            return j;
        }
    }

    /// Lists keep blank lines that are followed by a nested item or indented content.
    fn list_end(&self, lines: &Lines<'_>, mut j: usize) -> usize {
        let n = lines.len();
        loop {
            while j < n && !lines.blank(j) {
                let next = lines.get(j);
                if !is_list_continuation(next)
                    && (is_heading(next)
                        || thematic_break_char(next).is_some()
                        || is_fence_start(next)
                        || is_blockquote_start(next)
                        || is_html_block_start(next))
                {
                    return j;
                }
                j += 1;
            }
            let after = lines.skip_blank(j);
            if after < n && is_list_continuation(lines.get(after)) {
                j = after;
                continue;
            }
            return j;
        }
    }
}

impl Lexer for LineLexer {
    fn lex<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let lines = Lines::new(text);
        let mut tokens = Vec::new();
        let mut i = 0usize;
        while i < lines.len() {
            let (kind, next) = self.block_at(&lines, i);
            tokens.push(Token::new(kind, &text[lines.offset(i)..lines.offset(next)]));
            i = next;
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(BlockKind, &str)> {
        LineLexer.lex(text).into_iter().map(|t| (t.kind, t.raw)).collect()
    }

    #[test]
    fn paragraphs_and_space() {
        assert_eq!(
            kinds("a\nb\n\n\nc"),
            vec![
                (BlockKind::Paragraph, "a\nb\n"),
                (BlockKind::Space, "\n\n"),
                (BlockKind::Paragraph, "c"),
            ]
        );
    }

    #[test]
    fn fences_are_opaque() {
        assert_eq!(
            kinds("```\n# not\n\n- x\n```\nafter"),
            vec![
                (BlockKind::CodeFence, "```\n# not\n\n- x\n```\n"),
                (BlockKind::Paragraph, "after"),
            ]
        );
    }

    #[test]
    fn setext_and_tables() {
        assert_eq!(kinds("Title\n---\n")[0], (BlockKind::Heading, "Title\n---\n"));
        assert_eq!(
            kinds("intro\n| a | b |\n| - | - |\n| 1 | 2 |"),
            vec![
                (BlockKind::Paragraph, "intro\n"),
                (BlockKind::Table, "| a | b |\n| - | - |\n| 1 | 2 |"),
            ]
        );
    }

    #[test]
    fn lists_span_blank_lines_before_items() {
        assert_eq!(
            kinds("- a\n\n- b\n\nafter"),
            vec![
                (BlockKind::List, "- a\n\n- b\n"),
                (BlockKind::Space, "\n"),
                (BlockKind::Paragraph, "after"),
            ]
        );
    }
}
