use rstest::rstest;
use situjson::{Document, EmitOptions};

fn compact(text: &str) -> String {
    let mut doc = Document::new();
    doc.parse_text(text).unwrap();
    doc.dump(&EmitOptions::new())
}

fn formatted(text: &str) -> String {
    let mut doc = Document::new();
    doc.parse_text(text).unwrap();
    doc.dump(&EmitOptions::new().with_formatted(true))
}

#[rstest]
fn test_compact_doubles() {
    assert_eq!(compact("[0.1, 1e100, -3.14]"), "[0.1,1e100,-3.14]");
}

#[rstest]
fn test_compact_mixed() {
    assert_eq!(
        compact(r#"{ "a" : [ 1 , true ] , "b" : null }"#),
        r#"{"a":[1,true],"b":null}"#
    );
}

#[rstest]
fn test_empty_containers() {
    assert_eq!(compact("[]"), "[]");
    assert_eq!(compact("{}"), "{}");
    assert_eq!(formatted("[]"), "[ ]");
    assert_eq!(formatted("{}"), "{ }");
    assert_eq!(compact(r#"{"a":[],"b":{}}"#), r#"{"a":[],"b":{}}"#);
}

#[rstest]
fn test_formatted_array() {
    assert_eq!(formatted("[1,2]"), "[\n\t1, \n\t2\n]");
}

#[rstest]
fn test_formatted_object_with_nesting() {
    let out = formatted(r#"{"a":1,"b":[true,null]}"#);
    assert_eq!(
        out,
        "{\n\t\"a\" : 1, \n\t\"b\" : [\n\t\ttrue, \n\t\tnull\n\t]\n}"
    );
}

#[rstest]
fn test_formatted_nested_empties() {
    assert_eq!(formatted("[[],{}]"), "[\n\t[ ], \n\t{ }\n]");
}

#[rstest]
fn test_string_escapes_resurface() {
    assert_eq!(
        compact(r#"["tab\there", "nl\nhere", "q\"here"]"#),
        r#"["tab\there","nl\nhere","q\"here"]"#
    );
}

#[rstest]
fn test_control_bytes_emit_as_hex_escapes() {
    // the 0x01 byte survives the parse as one byte and re-escapes numerically
    let out = compact("[\"a\\u0001b\"]");
    assert_eq!(out, "[\"a\\u0001b\"]");
}

#[rstest]
fn test_unicode_content_passes_through() {
    assert_eq!(compact(r#"["héllo → wörld"]"#), r#"["héllo → wörld"]"#);
}

#[rstest]
fn test_int_extremes() {
    assert_eq!(compact("[0, -1, 999999999, -999999999]"), "[0,-1,999999999,-999999999]");
}

#[rstest]
fn test_double_shapes() {
    assert_eq!(
        compact("[12.34, 0.001234, 1e30, 1.234e33, 0.0000001, 120.0]"),
        "[12.34,0.001234,1e30,1.234e33,1e-7,120]"
    );
}
