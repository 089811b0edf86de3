use crate::scan::CodeMask;

/// Drop a trailing tag whose `>` has not arrived (`Hello <div cla` becomes `Hello`).
pub(super) fn strip_incomplete_tag(text: &str) -> Option<String> {
    let from = text.rfind('>').map_or(0, |i| i + 1);
    let bytes = text.as_bytes();
    let code = CodeMask::new(text);
    let lt = (from..bytes.len()).find(|&i| {
        bytes[i] == b'<'
            && bytes
                .get(i + 1)
                .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'/')
            && !code.in_code(i)
    })?;
    Some(text[..lt].trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_unterminated_tags() {
        assert_eq!(strip_incomplete_tag("Hello <div").as_deref(), Some("Hello"));
        assert_eq!(strip_incomplete_tag("<b>x</b"), Some("<b>x".to_string()));
        assert_eq!(strip_incomplete_tag("Hello <div>"), None);
        assert_eq!(strip_incomplete_tag("a < b"), None);
        assert_eq!(strip_incomplete_tag("use `<T` here"), None);
    }
}
