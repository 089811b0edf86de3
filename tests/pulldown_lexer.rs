#![cfg(feature = "pulldown")]

use mdmend::adapters::pulldown::PulldownLexer;
use mdmend::{BlockKind, Lexer, segment, segment_with};
use pretty_assertions::assert_eq;

const DOC: &str = "# Title\n\nPara with **bold**.\n\n- a\n- b\n\n```rust\nlet x = 1;\n```\n\n| a | b |\n| - | - |\n| 1 | 2 |\n\n[ref]: https://example.com\n";

#[test]
fn tokens_tile_the_input() {
    let tokens = PulldownLexer::default().lex(DOC);
    let joined: String = tokens.iter().map(|t| t.raw).collect();
    assert_eq!(joined, DOC);
}

#[test]
fn top_level_kinds() {
    let kinds: Vec<BlockKind> = PulldownLexer::default()
        .lex("# Title\n\nbody\n")
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != BlockKind::Space)
        .collect();
    assert_eq!(kinds, vec![BlockKind::Heading, BlockKind::Paragraph]);
}

#[test]
fn segmentation_is_lossless_with_either_lexer() {
    let blocks = segment_with(DOC, &PulldownLexer::default());
    assert_eq!(blocks.concat(), DOC);
    assert_eq!(segment(DOC).concat(), DOC);
}
