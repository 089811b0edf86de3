#![allow(dead_code)]

/// Every non-empty prefix of `text` that ends on a char boundary.
pub fn prefixes(text: &str) -> Vec<&str> {
    text.char_indices()
        .map(|(i, c)| &text[..i + c.len_utf8()])
        .collect()
}

pub fn chunk_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(|s| s.to_string()).collect()
}

pub fn chunk_chars(text: &str) -> Vec<String> {
    text.chars().map(|c| c.to_string()).collect()
}

fn fnv1a64(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in s.as_bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn xorshift64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

/// Deterministic chunking with sizes in `1..=max_bytes`, snapped forward to char boundaries.
pub fn chunk_pseudo_random(
    text: &str,
    seed_label: &str,
    trial: u64,
    max_bytes: usize,
) -> Vec<String> {
    assert!(max_bytes > 0);
    let mut state = fnv1a64(seed_label) ^ (trial.wrapping_mul(0x9e3779b97f4a7c15)) | 1;

    let mut out = Vec::new();
    let mut start = 0usize;
    while start < text.len() {
        let want = (xorshift64(&mut state) as usize % max_bytes) + 1;
        let mut end = (start + want).min(text.len());
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
        out.push(text[start..end].to_string());
        start = end;
    }
    out
}

/// Feed `chunks` as a growing buffer, yielding the accumulated text after each one.
pub fn accumulate(chunks: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut buf = String::new();
    chunks
        .into_iter()
        .map(|chunk| {
            buf.push_str(&chunk);
            buf.clone()
        })
        .collect()
}

pub const SAMPLE_DOC: &str = "# Release notes\n\nSome **bold** and *italic* text, `code` and a [link](https://example.com).\n\n- first item\n- second ~~old~~ item\n\n```rust\nlet x = a * b;\n```\n\nDone.\n";

/// Emphasis wrapped around inline code, and a `***` run after a finished italic.
pub const INLINE_CODE_DOC: &str = "Mixing **bold `code` inside** and *italic `x` too*.\n\nThen __under `y` line__ and ***all `z` three*** end.\n";

pub const HTML_LINKS_DOC: &str = "<details>\n<summary>More</summary>\n\nHidden **text** here.\n\n</details>\n\nSee [the docs](https://example.com) and ![logo](logo.png) too.\n";

pub const MATH_DOC: &str = "Display math:\n\n$$\nx^2 + y^2 = z^2\n$$\n\nAfter the math.\n";

pub const DOCS: [&str; 4] = [SAMPLE_DOC, INLINE_CODE_DOC, HTML_LINKS_DOC, MATH_DOC];
