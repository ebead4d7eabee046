use rstest::rstest;
use serde_json::json;
use situjson::{Arena, Document, Dom, EmitOptions, Tag, Value};

/// Rebuild a parsed tree as a `serde_json::Value` for structural equality
/// against the reference parser.
fn to_serde(dom: &Dom<'_>, value: Value) -> serde_json::Value {
    match value.tag() {
        Tag::Number => json!(value.as_f64()),
        Tag::Int => json!(value.as_i32()),
        Tag::String => json!(dom.str_utf8(value).expect("corpus strings are UTF-8")),
        Tag::Array => {
            serde_json::Value::Array(dom.elements(value).map(|v| to_serde(dom, v)).collect())
        }
        Tag::Object => serde_json::Value::Object(
            dom.members(value)
                .map(|(name, v)| {
                    (
                        String::from_utf8(name.to_vec()).unwrap(),
                        to_serde(dom, v),
                    )
                })
                .collect(),
        ),
        Tag::True => json!(true),
        Tag::False => json!(false),
        Tag::Null => json!(null),
    }
}

// Plain RFC 8259 documents: no comments, no unicode escapes, ints within
// nine digits so the reference parser sees the same numeric types.
const CORPUS: &[&str] = &[
    "{}",
    "[]",
    "[1,2,3]",
    r#"{"a":1,"b":2}"#,
    r#"{"k":"he\nlo"}"#,
    "[1.5e2, -0.25]",
    r#"[true, false, null]"#,
    r#"{"nested":{"deep":[[1],[2,[3]]]},"s":"text"}"#,
    r#"[0.1, 0.5, -17, 99999999]"#,
    r#"{"empty_a":[],"empty_o":{},"mix":[{"x":1},"two",3.5,null,true]}"#,
    r#"["quotes \" and \\ backslashes", "tabs\tand\nnewlines"]"#,
];

#[rstest]
fn test_matches_reference_parser() {
    for text in CORPUS {
        let mut doc = Document::new();
        let root = doc.parse_text(text).unwrap();
        let ours = to_serde(&doc.dom(), root);
        let reference: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(ours, reference, "corpus entry {text}");
    }
}

/// Like [`to_serde`] but with every number widened to f64, since a
/// whole-valued double emits as bare digits and reparses as an int.
fn to_serde_unified(dom: &Dom<'_>, value: Value) -> serde_json::Value {
    match value.tag() {
        Tag::Int => json!(value.as_i32() as f64),
        Tag::Array => serde_json::Value::Array(
            dom.elements(value).map(|v| to_serde_unified(dom, v)).collect(),
        ),
        Tag::Object => serde_json::Value::Object(
            dom.members(value)
                .map(|(name, v)| {
                    (
                        String::from_utf8(name.to_vec()).unwrap(),
                        to_serde_unified(dom, v),
                    )
                })
                .collect(),
        ),
        _ => to_serde(dom, value),
    }
}

#[rstest]
fn test_emit_then_reparse_is_stable() {
    for text in CORPUS {
        let mut doc = Document::new();
        let root = doc.parse_text(text).unwrap();
        let first = to_serde_unified(&doc.dom(), root);
        for options in [EmitOptions::new(), EmitOptions::new().with_formatted(true)] {
            let emitted = doc.dump(&options);
            let mut again = Document::new();
            let root2 = again.parse_text(&emitted).unwrap();
            assert_eq!(
                to_serde_unified(&again.dom(), root2),
                first,
                "corpus entry {text} via {emitted}"
            );
        }
    }
}

#[rstest]
fn test_emit_is_idempotent() {
    for text in CORPUS {
        let mut doc = Document::new();
        doc.parse_text(text).unwrap();
        let once = doc.dump(&EmitOptions::new());

        let mut doc2 = Document::new();
        doc2.parse_text(&once).unwrap();
        assert_eq!(doc2.dump(&EmitOptions::new()), once);
    }
}

fn emit_value(value: Value) -> String {
    let arena = Arena::new();
    Dom::new(b"", &arena, value).dump(&EmitOptions::new())
}

#[rstest]
fn test_doubles_round_trip_bit_for_bit() {
    // values whose emitted digits re-scale exactly, or whose single
    // pow10 multiply provably lands inside the half-ulp window
    let samples = [
        0.1,
        -0.1,
        0.25,
        0.5,
        1.5,
        150.0,
        1.0 / 3.0,
        std::f64::consts::PI,
        std::f64::consts::E,
        6.02214076e23,
        1e22,
        1e100,
        1e-100,
        2147483647.0,
    ];
    for d in samples {
        let text = emit_value(Value::number(d));
        let mut doc = Document::new();
        let root = doc.parse_text(&format!("[{text}]")).unwrap();
        let back = doc.dom().elements(root).next().unwrap();
        assert_eq!(back.tag(), Tag::Number, "{d} -> {text}");
        assert_eq!(back.as_f64().to_bits(), d.to_bits(), "{d} -> {text}");
    }
}

/// Distance in representation steps between two finite doubles of one sign.
fn ulp_distance(a: f64, b: f64) -> u64 {
    (a.to_bits() as i64 - b.to_bits() as i64).unsigned_abs()
}

#[rstest]
fn test_normal_range_round_trips_within_ulps() {
    // digit folding plus one table multiply round at most a few times, so
    // arbitrary normal doubles come back within a couple of steps
    let mut value = 1.917e-300f64;
    while value < 1.0e300 {
        let text = emit_value(Value::number(value));
        let mut doc = Document::new();
        let root = doc.parse_text(&format!("[{text}]")).unwrap();
        let back = doc.dom().elements(root).next().unwrap().as_f64();
        assert!(
            ulp_distance(back, value) <= 4,
            "{value} -> {text} -> {back}"
        );
        value *= 9.735;
    }
}

#[rstest]
fn test_scaling_saturates_outside_the_table() {
    // the pow10 table stops at 1e-323; deeper exponents flush to zero and
    // huge ones overflow to infinity, as the scaling design accepts
    let mut doc = Document::new();
    let root = doc.parse_text("[5e-324, 1e400, -1e400]").unwrap();
    let values: Vec<f64> = doc.dom().elements(root).map(|v| v.as_f64()).collect();
    assert_eq!(values[0], 0.0);
    assert_eq!(values[1], f64::INFINITY);
    assert_eq!(values[2], f64::NEG_INFINITY);
}

#[rstest]
fn test_nine_digit_ints_round_trip_through_int() {
    let samples = [
        0,
        1,
        -1,
        42,
        -360,
        999_999_999,
        -999_999_999,
        123_456_789,
    ];
    for i in samples {
        let text = emit_value(Value::int(i));
        let mut doc = Document::new();
        let root = doc.parse_text(&format!("[{text}]")).unwrap();
        let back = doc.dom().elements(root).next().unwrap();
        assert_eq!(back.tag(), Tag::Int, "{i} -> {text}");
        assert_eq!(back.as_i32(), i);
    }
}

#[rstest]
fn test_wide_ints_round_trip_by_value() {
    // ten-digit magnitudes come back as doubles with the same value
    for i in [i32::MAX, i32::MIN, 2_000_000_000, -1_234_567_890] {
        let text = emit_value(Value::int(i));
        let mut doc = Document::new();
        let root = doc.parse_text(&format!("[{text}]")).unwrap();
        let back = doc.dom().elements(root).next().unwrap();
        assert_eq!(back.tag(), Tag::Number);
        assert_eq!(back.as_f64(), i as f64);
    }
}
