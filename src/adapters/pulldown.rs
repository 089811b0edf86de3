use pulldown_cmark::{Event, Options as PulldownOptions, Parser, Tag};

use crate::segment::Lexer;
use crate::types::{BlockKind, Token};

/// [`Lexer`] backed by pulldown-cmark's offset iterator.
///
/// Top-level events become tokens. Bytes no event covers (blank lines, reference definitions)
/// become `Space` or `Unknown` tokens so the output still tiles the input.
#[derive(Debug, Clone, Copy)]
pub struct PulldownLexer {
    pub options: PulldownOptions,
}

impl Default for PulldownLexer {
    fn default() -> Self {
        Self {
            options: PulldownOptions::ENABLE_TABLES
                | PulldownOptions::ENABLE_STRIKETHROUGH
                | PulldownOptions::ENABLE_MATH,
        }
    }
}

fn kind_for_tag(tag: &Tag<'_>) -> BlockKind {
    match tag {
        Tag::Paragraph => BlockKind::Paragraph,
        Tag::Heading { .. } => BlockKind::Heading,
        Tag::CodeBlock(_) => BlockKind::CodeFence,
        Tag::List(_) => BlockKind::List,
        Tag::BlockQuote(_) => BlockKind::BlockQuote,
        Tag::Table(_) => BlockKind::Table,
        Tag::HtmlBlock => BlockKind::Html,
        _ => BlockKind::Unknown,
    }
}

fn gap(raw: &str) -> Token<'_> {
    let kind = if raw.trim().is_empty() {
        BlockKind::Space
    } else {
        BlockKind::Unknown
    };
    Token::new(kind, raw)
}

impl Lexer for PulldownLexer {
    fn lex<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut cursor = 0usize;
        let mut depth = 0usize;
        let mut open: Option<(BlockKind, usize)> = None;

        let mut push = |kind: BlockKind, start: usize, end: usize, tokens: &mut Vec<Token<'a>>| {
            let start = start.max(cursor);
            let end = end.max(start).min(text.len());
            if start > cursor {
                tokens.push(gap(&text[cursor..start]));
            }
            if end > start {
                tokens.push(Token::new(kind, &text[start..end]));
            }
            cursor = cursor.max(end);
        };

        for (event, range) in Parser::new_ext(text, self.options).into_offset_iter() {
            match event {
                Event::Start(tag) => {
                    if depth == 0 {
                        open = Some((kind_for_tag(&tag), range.start));
                    }
                    depth += 1;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        if let Some((kind, start)) = open.take() {
                            push(kind, start, range.end, &mut tokens);
                        }
                    }
                }
                Event::Rule if depth == 0 => {
                    push(BlockKind::ThematicBreak, range.start, range.end, &mut tokens);
                }
                _ if depth == 0 => push(BlockKind::Unknown, range.start, range.end, &mut tokens),
                _ => {}
            }
        }
        let end = text.len();
        push(BlockKind::Space, end, end, &mut tokens);
        tokens
    }
}
