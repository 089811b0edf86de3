use super::{appended, is_meaningful, tail_match};
use crate::count::{count_double_dollars, count_double_outside_fences};
use crate::scan::{CodeMask, is_part_of_triple_backtick};

pub(super) fn close_inline_code(text: &str) -> Option<String> {
    // Single-line triple backtick span: "```code``" is one backtick short.
    if !text.contains('\n') && text.starts_with("```") {
        let run = text.bytes().rev().take_while(|b| *b == b'`').count();
        if run == 2 || run == 3 {
            let body_end = text.len() - run;
            if body_end >= 3 && !text[3..body_end].contains('`') {
                return (run == 2).then(|| appended(text, "`"));
            }
        }
    }

    // An open fence owns everything after it.
    if text.matches("```").count() % 2 == 1 {
        return None;
    }

    let bytes = text.as_bytes();
    let marker = (0..bytes.len())
        .rev()
        .find(|&i| bytes[i] == b'`' && !is_part_of_triple_backtick(text, i))?;
    let code = CodeMask::new(text);
    if code.in_code(marker) || !is_meaningful(&text[marker + 1..]) {
        return None;
    }
    let singles = (0..bytes.len())
        .filter(|&i| bytes[i] == b'`' && !is_part_of_triple_backtick(text, i))
        .count();
    (singles % 2 == 1).then(|| appended(text, "`"))
}

pub(super) fn close_strikethrough(text: &str) -> Option<String> {
    let code = CodeMask::new(text);
    let m = tail_match(text, b'~', 2, true, |i| code.in_fence(i))?;
    if !is_meaningful(&text[m.start + 2..]) {
        return None;
    }
    if count_double_outside_fences(text, &code, b'~') % 2 == 0 {
        return None;
    }
    Some(appended(text, if m.half_closed { "~" } else { "~~" }))
}

pub(super) fn close_block_math(text: &str) -> Option<String> {
    let code = CodeMask::new(text);
    if count_double_dollars(text, &code) % 2 == 0 {
        return None;
    }
    let bytes = text.as_bytes();
    let first = (0..bytes.len().saturating_sub(1)).find(|&i| {
        bytes[i] == b'$'
            && bytes[i + 1] == b'$'
            && (i == 0 || bytes[i - 1] != b'\\')
            && !code.in_code(i)
    });
    let multiline = first.is_some_and(|i| text[i..].contains('\n'));
    if multiline && !text.ends_with('\n') {
        return Some(appended(text, "\n$$"));
    }
    Some(appended(text, "$$"))
}
