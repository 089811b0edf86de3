/// Best-effort classification of a top-level markdown unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading,
    ThematicBreak,
    CodeFence,
    List,
    BlockQuote,
    Table,
    Html,
    /// One or more blank lines between blocks.
    Space,
    Unknown,
}

/// A lexer output unit: one top-level construct and its exact source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: BlockKind,
    pub raw: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: BlockKind, raw: &'a str) -> Self {
        Self { kind, raw }
    }
}
