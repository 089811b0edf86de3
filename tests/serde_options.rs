#![cfg(feature = "serde")]

use mdmend::{LinkMode, Options, RenderMode};
use pretty_assertions::assert_eq;

#[test]
fn missing_fields_fall_back_to_defaults() {
    let opts: Options = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, Options::default());
}

#[test]
fn camel_case_fields_and_katex_alias() {
    let opts: Options = serde_json::from_str(
        r#"{"bold": false, "linkMode": "text-only", "katex": false, "setextHeadings": false}"#,
    )
    .unwrap();
    assert_eq!(
        opts,
        Options {
            bold: false,
            block_math: false,
            setext_headings: false,
            link_mode: LinkMode::TextOnly,
            ..Options::default()
        }
    );
}

#[test]
fn options_serialize_with_camel_case_names() {
    let value = serde_json::to_value(Options::none().with_link_mode(LinkMode::TextOnly)).unwrap();
    assert_eq!(value["linkMode"], "text-only");
    assert_eq!(value["blockMath"], false);
    assert_eq!(value["comparisonOperators"], false);
}

#[test]
fn render_mode_names() {
    let mode: RenderMode = serde_json::from_str(r#""static""#).unwrap();
    assert_eq!(mode, RenderMode::Static);
    assert_eq!(
        serde_json::to_string(&RenderMode::Streaming).unwrap(),
        r#""streaming""#
    );
}
