#[derive(Debug, Clone, PartialEq, Eq)]
enum HtmlTag {
    Opening { name: String, self_closing: bool },
    Closing { name: String },
    CommentOpen,
}

fn is_ascii_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn is_void_html_tag(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Parse a tag at the start of `s`. Returns the tag and the text after it.
fn parse_tag_at(s: &str) -> Option<(HtmlTag, &str)> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    if let Some(rest) = s.strip_prefix("<!--") {
        return Some((HtmlTag::CommentOpen, rest));
    }
    let mut i = 1;
    let is_closing = bytes.get(i) == Some(&b'/');
    if is_closing {
        i += 1;
    }
    if !bytes.get(i).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let name_start = i;
    while i < bytes.len() && is_ascii_tag_name_char(bytes[i]) {
        i += 1;
    }
    let name = s[name_start..i].to_ascii_lowercase();
    // Rejects autolinks such as `<https://...>`.
    if !matches!(bytes.get(i), Some(b' ' | b'\t' | b'\n' | b'>' | b'/')) {
        return None;
    }
    let close = i + s[i..].find('>')?;
    let rest = &s[close + 1..];

    if is_closing {
        return Some((HtmlTag::Closing { name }, rest));
    }
    let self_closing = s[i..close].trim_end().ends_with('/') || is_void_html_tag(&name);
    Some((HtmlTag::Opening { name, self_closing }, rest))
}

/// Every tag in `raw`, in order. Comment bodies are skipped.
fn tags(raw: &str) -> Vec<HtmlTag> {
    let mut out = Vec::new();
    let mut s = raw;
    while let Some(lt) = s.find('<') {
        let Some((tag, rest)) = parse_tag_at(&s[lt..]) else {
            s = &s[lt + 1..];
            continue;
        };
        s = rest;
        if tag == HtmlTag::CommentOpen {
            match s.find("-->") {
                Some(end) => s = &s[end + 3..],
                None => break,
            }
            continue;
        }
        out.push(tag);
    }
    out
}

/// Up to 3 leading spaces, then a tag open/close or a comment opener.
pub(crate) fn is_html_block_start(line: &str) -> bool {
    let indent = line.bytes().take(3).take_while(|b| *b == b' ').count();
    let s = line[indent..].trim_end();
    s.len() >= 3 && parse_tag_at(s).is_some()
}

/// The first opening tag of an HTML token and how many of its opens stay unclosed there.
pub(crate) fn unclosed_opening(raw: &str) -> Option<(String, usize)> {
    let tags = tags(raw);
    let name = tags.iter().find_map(|t| match t {
        HtmlTag::Opening { name, .. } => Some(name.clone()),
        _ => None,
    })?;
    let mut opens = 0usize;
    let mut closes = 0usize;
    for tag in &tags {
        match tag {
            HtmlTag::Opening {
                name: n,
                self_closing: false,
            } if *n == name => opens += 1,
            HtmlTag::Closing { name: n } if *n == name => closes += 1,
            _ => {}
        }
    }
    let depth = opens.saturating_sub(closes);
    (depth > 0).then_some((name, depth))
}

/// Walk the tags of a merged HTML token against the open-tag stack. Same-name opens nest,
/// a matching close pops, and scanning stops once the stack is empty.
pub(crate) fn track_tags(raw: &str, stack: &mut Vec<String>) {
    for tag in tags(raw) {
        let Some(top) = stack.last() else {
            return;
        };
        match tag {
            HtmlTag::Opening {
                name,
                self_closing: false,
            } if name == *top => stack.push(name),
            HtmlTag::Closing { name } if name == *top => {
                stack.pop();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_start_detection() {
        assert!(is_html_block_start("<div>"));
        assert!(is_html_block_start("  </details>"));
        assert!(is_html_block_start("<!-- note -->"));
        assert!(!is_html_block_start("<https://example.com>"));
        assert!(!is_html_block_start("a <b>"));
    }

    #[test]
    fn unclosed_depth_counts_same_name() {
        assert_eq!(
            unclosed_opening("<details>\n<details>\n</details>"),
            Some(("details".to_string(), 1))
        );
        assert_eq!(unclosed_opening("<div>x</div>"), None);
        assert_eq!(unclosed_opening("<br>"), None);
        assert_eq!(unclosed_opening("<img src=x />"), None);
    }

    #[test]
    fn tracking_pops_to_empty() {
        let mut stack = vec!["div".to_string()];
        track_tags("<div>\n</div>\n</div>\n<div>", &mut stack);
        assert!(stack.is_empty());
    }
}
