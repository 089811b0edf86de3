use super::{TailMatch, appended, is_meaningful, tail_match};
use crate::count::{MarkerScan, count_double, count_triple_asterisks};
use crate::scan::{CodeMask, is_horizontal_rule_line, is_line_prefix_list_marker};

/// The last `ch` outside fences sits in an inline code span.
///
/// A closer appended while a code span was still open ends up inside it, and so does any marker
/// the code span quotes. Either way the stage leaves the text alone, which keeps a second pass
/// from closing the same opener again.
fn last_marker_in_inline_code(text: &str, code: &CodeMask, ch: u8) -> bool {
    let bytes = text.as_bytes();
    (0..bytes.len())
        .rev()
        .find(|&i| bytes[i] == ch && !code.in_fence(i))
        .is_some_and(|i| code.in_code(i))
}

/// Shared checks for `**` and `__`: a trailing marker worth closing, with odd pair parity.
fn close_double(text: &str, ch: u8) -> Option<String> {
    let code = CodeMask::new(text);
    if last_marker_in_inline_code(text, &code, ch) {
        return None;
    }
    let TailMatch { start, half_closed } = tail_match(text, ch, 2, true, |i| code.in_code(i))?;
    let content = &text[start + 2..];
    if !is_meaningful(content) || is_horizontal_rule_line(text, start, ch) {
        return None;
    }
    // A marker right after a list bullet that runs onto the next line is left alone.
    if content.contains('\n') && is_line_prefix_list_marker(text, start) {
        return None;
    }
    if count_double(text, &code, ch) % 2 == 0 {
        return None;
    }
    let marker = if ch == b'*' { "**" } else { "__" };
    let closer = if half_closed { &marker[..1] } else { marker };
    Some(appended(text, closer))
}

pub(super) fn close_bold(text: &str) -> Option<String> {
    close_double(text, b'*')
}

pub(super) fn close_double_underscore(text: &str) -> Option<String> {
    close_double(text, b'_')
}

pub(super) fn close_bold_italic(text: &str) -> Option<String> {
    // A lone run of four or more asterisks is a rule in progress.
    let trimmed = text.trim();
    if trimmed.len() >= 4 && trimmed.bytes().all(|b| b == b'*') {
        return None;
    }
    let code = CodeMask::new(text);
    if last_marker_in_inline_code(text, &code, b'*') {
        return None;
    }
    let m = tail_match(text, b'*', 3, false, |i| code.in_code(i))?;
    if !is_meaningful(&text[m.start + 3..]) || is_horizontal_rule_line(text, m.start, b'*') {
        return None;
    }
    if count_triple_asterisks(text, &code) % 2 == 0 {
        return None;
    }
    // `**bold *italic***` style text is already balanced by its pairs and singles.
    let scan = MarkerScan::new(text);
    if count_double(text, &code, b'*') % 2 == 0 && scan.single_asterisks() % 2 == 0 {
        return None;
    }
    Some(appended(text, "***"))
}

pub(super) fn close_single_asterisk(text: &str) -> Option<String> {
    let scan = MarkerScan::new(text);
    if last_marker_in_inline_code(text, &scan.code, b'*') {
        return None;
    }
    let first = scan.first_single_asterisk()?;
    if !is_meaningful(&text[first + 1..]) || scan.single_asterisks() % 2 == 0 {
        return None;
    }
    Some(appended(text, "*"))
}

pub(super) fn close_single_underscore(text: &str) -> Option<String> {
    let scan = MarkerScan::new(text);
    if last_marker_in_inline_code(text, &scan.code, b'_') {
        return None;
    }
    let first = scan.first_single_underscore()?;
    if !is_meaningful(&text[first + 1..]) || scan.single_underscores() % 2 == 0 {
        return None;
    }
    Some(close_underscore_before_bold(text).unwrap_or_else(|| insert_closing_underscore(text)))
}

/// `**bold _italic**` closes as `**bold _italic_**`: the underscore goes inside the bold.
fn close_underscore_before_bold(text: &str) -> Option<String> {
    let without = text.strip_suffix("**")?;
    let code = CodeMask::new(without);
    if count_double(without, &code, b'*') % 2 == 0 {
        return None;
    }
    let first_double = without
        .match_indices("**")
        .map(|(i, _)| i)
        .find(|&i| !code.in_code(i))?;
    let underscore = MarkerScan::new(without).first_single_underscore()?;
    (first_double < underscore).then(|| format!("{without}_**"))
}

/// Append `_`, keeping trailing newlines after it.
fn insert_closing_underscore(text: &str) -> String {
    let body = text.trim_end_matches('\n');
    let mut out = String::with_capacity(text.len() + 1);
    out.push_str(body);
    out.push('_');
    out.push_str(&text[body.len()..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_closed_bold_gets_one_asterisk() {
        assert_eq!(close_bold("**bold*").as_deref(), Some("**bold**"));
        assert_eq!(close_double_underscore("__it_").as_deref(), Some("__it__"));
    }

    #[test]
    fn underscore_moves_inside_trailing_bold() {
        assert_eq!(
            close_single_underscore("**_text**").as_deref(),
            Some("**_text_**")
        );
        assert_eq!(insert_closing_underscore("_a\n\n"), "_a_\n\n");
    }

    #[test]
    fn closers_sealed_in_inline_code_are_not_doubled() {
        assert_eq!(close_bold("**bold with `code**`"), None);
        assert_eq!(close_bold("**bold with `code**"), None);
        assert_eq!(close_bold_italic("***bi `c***`"), None);
        assert_eq!(close_single_asterisk("*it `c*`"), None);
        assert_eq!(close_double_underscore("__u `c__`"), None);
        assert_eq!(close_single_underscore("_u `c_`"), None);
        // A marker inside a finished fence does not count as the last one.
        assert_eq!(
            close_bold("**x\n```\n`a**`\n```\n").as_deref(),
            Some("**x\n```\n`a**`\n```\n**")
        );
    }

    #[test]
    fn rules_and_runs_are_left_alone() {
        assert_eq!(close_bold_italic("****"), None);
        assert_eq!(close_bold("***"), None);
        assert_eq!(close_single_asterisk("* * *"), None);
    }
}
