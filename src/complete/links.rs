use crate::options::{LinkMode, Options};
use crate::scan::{CodeMask, trim_trailing_single_space};

/// URL given to links whose destination has not streamed in yet.
pub const INCOMPLETE_LINK_URL: &str = "streamdown:incomplete-link";

pub(super) fn ends_with_placeholder(text: &str) -> bool {
    text.strip_suffix(')')
        .and_then(|s| s.strip_suffix(INCOMPLETE_LINK_URL))
        .is_some_and(|s| s.ends_with("]("))
}

fn find_matching_open_bracket(bytes: &[u8], close: usize) -> Option<usize> {
    let mut depth = 1usize;
    for i in (0..close).rev() {
        match bytes[i] {
            b']' => depth += 1,
            b'[' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn find_matching_close_bracket(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, b) in bytes.iter().enumerate().skip(open + 1) {
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn drop_image(text: &str, start: usize) -> String {
    trim_trailing_single_space(&text[..start]).to_string()
}

/// Repair a trailing link or image that is missing its `]` or `)`.
///
/// Images cannot render without a source and are dropped. Links either point at
/// [`INCOMPLETE_LINK_URL`] or collapse to their text, depending on [`LinkMode`].
pub(super) fn fix_incomplete_link_or_image(text: &str, opts: &Options) -> Option<String> {
    let code = CodeMask::new(text);
    let bytes = text.as_bytes();

    // `[text](partial-url` with no closing paren.
    let mut search = text.len();
    while let Some(idx) = text[..search].rfind("](") {
        search = idx;
        if code.in_code(idx) || text[idx + 2..].contains(')') {
            continue;
        }
        let Some(open) = find_matching_open_bracket(bytes, idx) else {
            continue;
        };
        if code.in_code(open) {
            continue;
        }
        let is_image = open > 0 && bytes[open - 1] == b'!';
        if (is_image && !opts.images) || (!is_image && !opts.links) {
            continue;
        }
        if is_image {
            return Some(drop_image(text, open - 1));
        }
        let before = &text[..open];
        let label = &text[open + 1..idx];
        return Some(match opts.link_mode {
            LinkMode::Protocol => format!("{before}[{label}]({INCOMPLETE_LINK_URL})"),
            LinkMode::TextOnly => format!("{before}{label}"),
        });
    }

    // `[text` with no matching `]`.
    for i in (0..bytes.len()).rev() {
        if bytes[i] != b'[' || code.in_code(i) {
            continue;
        }
        let is_image = i > 0 && bytes[i - 1] == b'!';
        if (is_image && !opts.images) || (!is_image && !opts.links) {
            continue;
        }
        if find_matching_close_bracket(bytes, i).is_some() {
            continue;
        }
        if is_image {
            return Some(drop_image(text, i - 1));
        }
        return Some(match opts.link_mode {
            LinkMode::Protocol => format!("{text}]({INCOMPLETE_LINK_URL})"),
            LinkMode::TextOnly => format!("{}{}", &text[..i], &text[i + 1..]),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_suffix() {
        assert!(ends_with_placeholder("[a](streamdown:incomplete-link)"));
        assert!(!ends_with_placeholder("[a](streamdown:incomplete-link) b"));
        assert!(!ends_with_placeholder("streamdown:incomplete-link)"));
    }

    #[test]
    fn text_only_unwraps_label() {
        let opts = Options::default().with_link_mode(LinkMode::TextOnly);
        assert_eq!(
            fix_incomplete_link_or_image("see [docs](http://x", &opts).as_deref(),
            Some("see docs")
        );
        assert_eq!(
            fix_incomplete_link_or_image("see [docs", &opts).as_deref(),
            Some("see docs")
        );
    }

    #[test]
    fn images_are_dropped() {
        let opts = Options::default();
        assert_eq!(
            fix_incomplete_link_or_image("a ![alt](http://x", &opts).as_deref(),
            Some("a")
        );
    }
}
