//! Position classifiers shared by the completion handlers.
//!
//! Every function here is a pure predicate over `(text, byte position)`. The `*Mask` types answer
//! the same questions for every position at once, so counters stay linear.

pub(crate) fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// ASCII fast path, then Unicode alphanumerics.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c.is_alphanumeric()
}

/// True when `s` contains nothing but whitespace and emphasis/code markers.
pub(crate) fn whitespace_or_markers_only(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_whitespace() || matches!(c, '_' | '~' | '*' | '`'))
}

pub(crate) fn is_part_of_triple_backtick(text: &str, i: usize) -> bool {
    let bytes = text.as_bytes();
    if i + 2 < bytes.len() && &bytes[i..i + 3] == b"```" {
        return true;
    }
    if i >= 1 && i + 1 < bytes.len() && &bytes[i - 1..i + 2] == b"```" {
        return true;
    }
    i >= 2 && &bytes[i - 2..i + 1] == b"```"
}

/// Characters on either side of byte `i`, decoded as chars (not bytes) so multi-byte letters
/// count as word characters.
pub(crate) fn neighbours(text: &str, i: usize) -> (Option<char>, Option<char>) {
    let prev = text[..i].chars().next_back();
    let next = text.get(i + 1..).and_then(|s| s.chars().next());
    (prev, next)
}

/// Toggle on every ```` ``` ```` run before `pos`. Fence length and indentation are ignored.
pub fn is_inside_code_fence(text: &str, pos: usize) -> bool {
    CodeMask::new(text).in_fence(pos)
}

/// Fenced code or an inline backtick span.
pub fn is_inside_code(text: &str, pos: usize) -> bool {
    CodeMask::new(text).in_code(pos)
}

#[derive(Debug, Clone, Copy, Default)]
struct CodeState {
    fence: bool,
    inline: bool,
}

/// Code membership for every byte position of a text (plus one past the end).
#[derive(Debug, Clone)]
pub struct CodeMask {
    states: Vec<CodeState>,
}

impl CodeMask {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut states = vec![CodeState::default(); bytes.len() + 1];
        let mut cur = CodeState::default();
        let mut i = 0usize;
        while i < bytes.len() {
            states[i] = cur;
            if i + 2 < bytes.len() && &bytes[i..i + 3] == b"```" {
                cur.fence = !cur.fence;
                states[i + 1] = cur;
                states[i + 2] = cur;
                i += 3;
                continue;
            }
            if !cur.fence && bytes[i] == b'`' {
                cur.inline = !cur.inline;
            }
            i += 1;
        }
        states[bytes.len()] = cur;
        Self { states }
    }

    fn state(&self, pos: usize) -> CodeState {
        let last = self.states.len() - 1;
        self.states[pos.min(last)]
    }

    pub fn in_fence(&self, pos: usize) -> bool {
        self.state(pos).fence
    }

    pub fn in_code(&self, pos: usize) -> bool {
        let s = self.state(pos);
        s.fence || s.inline
    }
}

/// Inline `$…$` or block `$$…$$` math at `pos`. Escaped `\$` is skipped.
pub fn is_within_math(text: &str, pos: usize) -> bool {
    MathMask::new(text).contains(pos)
}

#[derive(Debug, Clone)]
pub struct MathMask {
    inside: Vec<bool>,
}

impl MathMask {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut inside = vec![false; bytes.len() + 1];
        if !text.contains('$') {
            return Self { inside };
        }
        let mut in_inline = false;
        let mut in_block = false;
        let mut i = 0usize;
        while i < bytes.len() {
            inside[i] = in_inline || in_block;
            if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'$') {
                inside[i + 1] = inside[i];
                i += 2;
                continue;
            }
            if bytes[i] == b'$' {
                if bytes.get(i + 1) == Some(&b'$') {
                    in_block = !in_block;
                    in_inline = false;
                    inside[i + 1] = in_block;
                    i += 2;
                    continue;
                }
                if !in_block {
                    in_inline = !in_inline;
                }
            }
            i += 1;
        }
        inside[bytes.len()] = in_inline || in_block;
        Self { inside }
    }

    pub fn contains(&self, pos: usize) -> bool {
        let last = self.inside.len() - 1;
        self.inside[pos.min(last)]
    }
}

/// Inside the `(...)` of a `[text](url)` on the same line, with the `)` already present.
pub fn is_within_link_or_image_url(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    let mut i = pos.min(bytes.len());
    while i > 0 {
        i -= 1;
        match bytes[i] {
            b'\n' | b')' => return false,
            b'(' => {
                if i == 0 || bytes[i - 1] != b']' {
                    return false;
                }
                return bytes[pos..]
                    .iter()
                    .take_while(|b| **b != b'\n')
                    .any(|b| *b == b')');
            }
            _ => {}
        }
    }
    false
}

/// Between a tag-opening `<` and its `>` on the same line.
pub fn is_within_html_tag(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    let mut i = pos.min(bytes.len());
    while i > 0 {
        i -= 1;
        match bytes[i] {
            b'\n' | b'>' => return false,
            b'<' => {
                return bytes
                    .get(i + 1)
                    .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'/');
            }
            _ => {}
        }
    }
    false
}

/// The marker's line holds three or more `marker` bytes and only spaces or tabs otherwise.
pub fn is_horizontal_rule_line(text: &str, pos: usize, marker: u8) -> bool {
    let bytes = text.as_bytes();
    let (start, end) = line_bounds(text, pos);
    let mut count = 0usize;
    for &b in &bytes[start..end] {
        if b == marker {
            count += 1;
        } else if !is_space_or_tab(b) {
            return false;
        }
    }
    count >= 3
}

/// Bullet (`*`, `+`, `-`) or ordered-list digits starting a line, followed by a space or tab.
pub fn is_list_marker_at(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    let (line_start, _) = line_bounds(text, pos);
    let mut j = line_start;
    let mut spaces = 0;
    while j < bytes.len() && spaces < 3 && bytes[j] == b' ' {
        spaces += 1;
        j += 1;
    }
    if j >= bytes.len() {
        return false;
    }
    if j == pos && matches!(bytes[j], b'*' | b'+' | b'-') {
        return bytes.get(j + 1).is_some_and(|b| is_space_or_tab(*b));
    }
    if j == pos && bytes[j].is_ascii_digit() {
        let mut k = j;
        while k < bytes.len() && bytes[k].is_ascii_digit() {
            k += 1;
        }
        if matches!(bytes.get(k), Some(b'.' | b')')) {
            return bytes.get(k + 1).is_some_and(|b| is_space_or_tab(*b));
        }
    }
    false
}

/// The text before `pos` on its line is a lone bullet plus whitespace (`- `, `  * `).
pub(crate) fn is_line_prefix_list_marker(text: &str, pos: usize) -> bool {
    let (line_start, _) = line_bounds(text, pos);
    crate::syntax::is_list_marker_line_prefix(&text[line_start..pos])
}

/// Byte range of the line containing `pos`, newline excluded.
pub(crate) fn line_bounds(text: &str, pos: usize) -> (usize, usize) {
    let bytes = text.as_bytes();
    let pos = pos.min(bytes.len());
    let start = bytes[..pos]
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1);
    let end = bytes[pos..]
        .iter()
        .position(|b| *b == b'\n')
        .map_or(bytes.len(), |i| pos + i);
    (start, end)
}

/// Drop one trailing plain space. Two spaces form a hard break and stay.
pub(crate) fn trim_trailing_single_space(text: &str) -> &str {
    if text.ends_with(' ') && !text.ends_with("  ") {
        &text[..text.len() - 1]
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_mask_matches_scanning_definition() {
        let text = "a `b` ```\nc `d\n``` e";
        let mask = CodeMask::new(text);
        for pos in 0..=text.len() {
            let bytes = text.as_bytes();
            let (mut inline, mut fence) = (false, false);
            let mut i = 0;
            while i < pos && i < bytes.len() {
                if i + 2 < bytes.len() && &bytes[i..i + 3] == b"```" {
                    fence = !fence;
                    i += 3;
                    continue;
                }
                if !fence && bytes[i] == b'`' {
                    inline = !inline;
                }
                i += 1;
            }
            assert_eq!(mask.in_fence(pos), fence, "fence at {pos}");
            assert_eq!(mask.in_code(pos), fence || inline, "code at {pos}");
        }
    }

    #[test]
    fn math_mask_tracks_inline_and_block() {
        let text = r"a $x$ b $$y$$ \$c";
        let mask = MathMask::new(text);
        assert!(!mask.contains(0));
        assert!(mask.contains(3));
        assert!(!mask.contains(6));
        assert!(mask.contains(10));
        assert!(!mask.contains(text.len()));
    }

    #[test]
    fn link_url_requires_closing_paren() {
        let text = "[a](http://x_y) and [b](http://z_w";
        assert!(is_within_link_or_image_url(text, text.find("x_y").unwrap() + 1));
        assert!(!is_within_link_or_image_url(text, text.find("z_w").unwrap() + 1));
    }

    #[test]
    fn html_tag_scope() {
        let text = "<a target=\"_blank\">x_y</a>";
        assert!(is_within_html_tag(text, text.find('_').unwrap()));
        assert!(!is_within_html_tag(text, text.find("x_y").unwrap() + 1));
        assert!(!is_within_html_tag("a < b_c", 5));
    }

    #[test]
    fn list_markers() {
        assert!(is_list_marker_at("* item", 0));
        assert!(is_list_marker_at("x\n  - item", 4));
        assert!(is_list_marker_at("12. item", 0));
        assert!(!is_list_marker_at("*item", 0));
        assert!(!is_list_marker_at("a * b", 2));
    }

    #[test]
    fn horizontal_rules() {
        assert!(is_horizontal_rule_line("x\n* * *", 2, b'*'));
        assert!(!is_horizontal_rule_line("**bold", 0, b'*'));
    }
}
