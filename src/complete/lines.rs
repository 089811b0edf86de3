use crate::scan::{CodeMask, is_space_or_tab};

/// Zero-width space appended after a lone `-`/`=` marker line.
const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// A trailing `-`, `--`, `=` or `==` line under a paragraph line would turn that line into a
/// setext heading for one frame. Appending a zero-width space breaks the underline.
pub(super) fn protect_setext_marker(text: &str) -> Option<String> {
    let last_nl = text.rfind('\n')?;
    let prev = &text[..last_nl];
    let prev_line = prev.rsplit('\n').next().unwrap_or(prev);
    if prev_line.trim().is_empty() {
        return None;
    }

    let last_line = &text[last_nl + 1..];
    if last_line.ends_with([' ', '\t']) {
        return None;
    }
    if !matches!(last_line.trim(), "-" | "--" | "=" | "==") {
        return None;
    }
    if CodeMask::new(text).in_fence(last_nl + 1) {
        return None;
    }

    let mut out = String::with_capacity(text.len() + ZERO_WIDTH_SPACE.len_utf8());
    out.push_str(text);
    out.push(ZERO_WIDTH_SPACE);
    Some(out)
}

/// Byte offset of `>` in a list item that starts with a comparison such as `- > 25` or
/// `1. >= $100`.
fn list_comparison_offset(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = bytes.iter().take_while(|b| is_space_or_tab(**b)).count();
    match bytes.get(i)? {
        b'-' | b'*' | b'+' => i += 1,
        b'0'..=b'9' => {
            i += bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
            if !matches!(bytes.get(i), Some(b'.' | b')')) {
                return None;
            }
            i += 1;
        }
        _ => return None,
    }
    let ws = bytes[i..].iter().take_while(|b| is_space_or_tab(**b)).count();
    if ws == 0 || bytes.get(i + ws) != Some(&b'>') {
        return None;
    }
    let gt = i + ws;
    let mut j = gt + 1;
    if bytes.get(j) == Some(&b'=') {
        j += 1;
    }
    j += bytes[j.min(bytes.len())..]
        .iter()
        .take_while(|b| is_space_or_tab(**b))
        .count();
    if bytes.get(j) == Some(&b'$') {
        j += 1;
    }
    bytes.get(j).is_some_and(u8::is_ascii_digit).then_some(gt)
}

/// `- > 25` would render as a list item holding a blockquote; escape the `>` instead.
pub(super) fn escape_list_comparisons(text: &str) -> Option<String> {
    if !text.contains('>') {
        return None;
    }
    let code = CodeMask::new(text);
    let mut hits = Vec::new();
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        if !code.in_fence(offset) {
            if let Some(gt) = list_comparison_offset(line) {
                hits.push(offset + gt);
            }
        }
        offset += line.len();
    }
    if hits.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(text.len() + hits.len());
    let mut last = 0usize;
    for gt in hits {
        out.push_str(&text[last..gt]);
        out.push('\\');
        last = gt;
    }
    out.push_str(&text[last..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setext_marker_gets_zero_width_space() {
        assert_eq!(
            protect_setext_marker("Title\n-").as_deref(),
            Some("Title\n-\u{200B}")
        );
        assert_eq!(protect_setext_marker("Title\n- "), None);
        assert_eq!(protect_setext_marker("\n-"), None);
        assert_eq!(protect_setext_marker("Title\n---"), None);
    }

    #[test]
    fn comparison_in_list_item() {
        assert_eq!(list_comparison_offset("- > 25"), Some(2));
        assert_eq!(list_comparison_offset("1. >= $100"), Some(3));
        assert_eq!(list_comparison_offset("- > quote"), None);
        assert_eq!(list_comparison_offset("> 25"), None);
    }
}
