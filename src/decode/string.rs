//! In-place string unescaping.
//!
//! The decoded bytes are written back over the escaped source, so the write
//! cursor can never pass the read cursor. The closing quote is overwritten
//! with NUL, leaving the content NUL-delimited inside the buffer.

use crate::decode::tables::{matches, TEXT_BREAK};
use crate::error::Error;
use crate::Result;

/// Unescape the quoted string starting at `pos`, which must be the first
/// content byte (the opening quote is already consumed). Returns the
/// position just past the closing quote.
///
/// `\uXXXX` is decoded as a single code point in 0..=0xFFFF and re-encoded
/// as one to three UTF-8 bytes; surrogate halves are not paired. U+0000
/// takes the two-byte form so the content never holds a bare NUL. An escape
/// other than the JSON set is kept verbatim, backslash included.
pub(crate) fn unescape_in_place(buf: &mut [u8], pos: usize) -> Result<usize> {
    let mut r = pos;
    while !matches(buf[r], TEXT_BREAK) {
        r += 1;
    }
    let mut w = r;
    let mut ch = buf[r];
    r += 1;
    while ch != b'"' {
        if ch != b'\\' {
            // bare NUL, CR or LF inside the string
            return Err(Error::BadString);
        }
        ch = buf[r];
        r += 1;
        if ch == b'u' {
            let mut u: u32 = 0;
            for _ in 0..4 {
                let c = buf[r];
                r += 1;
                u = (u << 4)
                    + match c {
                        b'0'..=b'9' => (c - b'0') as u32,
                        b'a'..=b'f' => (c - b'a' + 10) as u32,
                        b'A'..=b'F' => (c - b'A' + 10) as u32,
                        _ => return Err(Error::BadString),
                    };
            }
            if u != 0 && u < 0x80 {
                buf[w] = u as u8;
                w += 1;
            } else if u < 0x800 {
                buf[w] = 0xC0 | (u >> 6) as u8;
                buf[w + 1] = 0x80 | (u & 0x3F) as u8;
                w += 2;
            } else {
                buf[w] = 0xE0 | (u >> 12) as u8;
                buf[w + 1] = 0x80 | ((u >> 6) & 0x3F) as u8;
                buf[w + 2] = 0x80 | (u & 0x3F) as u8;
                w += 3;
            }
        } else {
            match ch {
                b'b' => ch = 0x08,
                b'f' => ch = 0x0C,
                b'n' => ch = b'\n',
                b'r' => ch = b'\r',
                b't' => ch = b'\t',
                b'\\' | b'"' => {}
                0 => return Err(Error::BadString),
                _ => {
                    // unrecognized escape, kept with its backslash
                    buf[w] = b'\\';
                    w += 1;
                }
            }
            buf[w] = ch;
            w += 1;
        }
        ch = buf[r];
        r += 1;
        while !matches(ch, TEXT_BREAK) {
            buf[w] = ch;
            w += 1;
            ch = buf[r];
            r += 1;
        }
    }
    buf[w] = 0;
    Ok(r)
}
