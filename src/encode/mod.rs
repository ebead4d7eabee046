//! JSON text emission.
//!
//! The walker dispatches on the value tag and recurses through composites.
//! Compact mode writes no whitespace at all. Formatted mode indents with one
//! tab per depth, breaks after every element, and spaces out separators the
//! same way the bounded and growing sinks both receive them.

mod sink;

pub use sink::{BoundedSink, ByteSink, GrowingSink, GROWING_SINK_RESERVE};

use crate::document::Dom;
use crate::num::{dtoa, i32toa, F64_BUFFER_LEN, I32_BUFFER_LEN};
use crate::value::{Tag, Value};

/// Emitter layout options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    pub formatted: bool,
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formatted(mut self, formatted: bool) -> Self {
        self.formatted = formatted;
        self
    }
}

/// Serialize `value` and everything under it into `out`.
pub fn write_value<S: ByteSink>(dom: &Dom<'_>, value: Value, out: &mut S, options: &EmitOptions) {
    write_value_at(dom, value, out, options.formatted, 0);
}

fn write_value_at<S: ByteSink>(dom: &Dom<'_>, value: Value, out: &mut S, formatted: bool, indent: usize) {
    match value.tag() {
        Tag::Number => write_f64(out, value.as_f64()),
        Tag::Int => {
            let mut buf = [0u8; I32_BUFFER_LEN];
            let n = i32toa(value.as_i32(), &mut buf);
            out.write_bytes(&buf[..n]);
        }
        Tag::String => write_escaped(out, dom.str_bytes_at(value.str_offset())),
        Tag::Array => {
            let Some(head) = value.first_node() else {
                out.write_bytes(if formatted { b"[ ]" } else { b"[]" });
                return;
            };
            out.write_byte(b'[');
            if formatted {
                out.write_byte(b'\n');
            }
            let indent = indent + 1;
            let mut next = Some(head);
            while let Some(id) = next {
                let node = dom.arena().array_node(id);
                if formatted {
                    out.write_tabs(indent);
                }
                write_value_at(dom, node.value, out, formatted, indent);
                write_separators(out, formatted, node.next.is_some());
                next = node.next;
            }
            if formatted {
                out.write_tabs(indent - 1);
            }
            out.write_byte(b']');
        }
        Tag::Object => {
            let Some(head) = value.first_node() else {
                out.write_bytes(if formatted { b"{ }" } else { b"{}" });
                return;
            };
            out.write_byte(b'{');
            if formatted {
                out.write_byte(b'\n');
            }
            let indent = indent + 1;
            let mut next = Some(head);
            while let Some(id) = next {
                let node = dom.arena().object_node(id);
                if formatted {
                    out.write_tabs(indent);
                }
                write_escaped(out, dom.str_bytes_at(node.name));
                out.write_bytes(if formatted { b" : " } else { b":" });
                write_value_at(dom, node.value, out, formatted, indent);
                write_separators(out, formatted, node.next.is_some());
                next = node.next;
            }
            if formatted {
                out.write_tabs(indent - 1);
            }
            out.write_byte(b'}');
        }
        Tag::True => out.write_bytes(b"true"),
        Tag::False => out.write_bytes(b"false"),
        Tag::Null => out.write_bytes(b"null"),
    }
}

#[inline]
fn write_separators<S: ByteSink>(out: &mut S, formatted: bool, has_next: bool) {
    if has_next {
        out.write_byte(b',');
        if formatted {
            out.write_byte(b' ');
        }
    }
    if formatted {
        out.write_byte(b'\n');
    }
}

/// Printable ASCII passes through, the JSON short escapes cover the usual
/// controls, and anything else below space becomes `\u00HH`. Bytes at or
/// above 0x80 pass through untouched.
fn write_escaped<S: ByteSink>(out: &mut S, s: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.write_byte(b'"');
    for &c in s {
        if c >= b' ' && c != b'"' && c != b'\\' {
            out.write_byte(c);
            continue;
        }
        out.write_byte(b'\\');
        match c {
            0x08 => out.write_byte(b'b'),
            b'\r' => out.write_byte(b'r'),
            b'\t' => out.write_byte(b't'),
            0x0C => out.write_byte(b'f'),
            b'\n' => out.write_byte(b'n'),
            b'\\' => out.write_byte(b'\\'),
            b'"' => out.write_byte(b'"'),
            _ => {
                out.write_bytes(b"u00");
                out.write_byte(HEX[(c >> 4) as usize]);
                out.write_byte(HEX[(c & 0xF) as usize]);
            }
        }
    }
    out.write_byte(b'"');
}

/// Finite doubles go through the shortest-decimal path; NaN and the
/// infinities have no JSON spelling and come out as `null`.
fn write_f64<S: ByteSink>(out: &mut S, value: f64) {
    if !value.is_finite() {
        out.write_bytes(b"null");
        return;
    }
    let mut buf = [0u8; F64_BUFFER_LEN];
    let n = dtoa(value, &mut buf);
    out.write_bytes(&buf[..n]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &[u8]) -> String {
        let mut sink = GrowingSink::new();
        write_escaped(&mut sink, s);
        String::from_utf8(sink.into_vec()).unwrap()
    }

    #[rstest::rstest]
    fn test_escaping() {
        assert_eq!(escaped(b"plain"), r#""plain""#);
        assert_eq!(escaped(b"a\"b"), r#""a\"b""#);
        assert_eq!(escaped(b"a\\b"), r#""a\\b""#);
        assert_eq!(escaped(b"a\nb\tc"), r#""a\nb\tc""#);
        assert_eq!(escaped(b"\x08\x0C\r"), r#""\b\f\r""#);
        assert_eq!(escaped(b"\x01\x1f"), "\"\\u0001\\u001f\"");
        assert_eq!(escaped("héllo".as_bytes()), "\"héllo\"");
    }

    #[rstest::rstest]
    fn test_non_finite_doubles_emit_null() {
        let mut sink = GrowingSink::new();
        write_f64(&mut sink, f64::NAN);
        write_f64(&mut sink, f64::INFINITY);
        write_f64(&mut sink, f64::NEG_INFINITY);
        assert_eq!(sink.as_slice(), b"nullnullnull");
    }

    #[rstest::rstest]
    fn test_options_builder() {
        assert!(!EmitOptions::new().formatted);
        assert!(EmitOptions::new().with_formatted(true).formatted);
    }
}
