//! Ownership shell around a parse.
//!
//! A [`Document`] owns the arena and the text buffer and can be parsed into
//! over and over; each parse recycles the arena's blocks. A [`Dom`] is the
//! borrowed trio of buffer, arena and root that readers and the emitter
//! work against. Callers managing their own buffers use [`crate::parse`]
//! directly and build a `Dom` from the pieces.

use memchr::memchr;

use crate::arena::{Arena, NodeId};
use crate::encode::{self, BoundedSink, ByteSink, EmitOptions, GrowingSink};
use crate::value::{Tag, Value};
use crate::{decode, Result};

/// Borrowed view over one parsed tree.
#[derive(Clone, Copy)]
pub struct Dom<'a> {
    buf: &'a [u8],
    arena: &'a Arena,
    root: Value,
}

impl<'a> Dom<'a> {
    /// Assemble a view from caller-managed pieces. `buf` must be the buffer
    /// the tree was parsed from and `arena` the arena it was built into.
    pub fn new(buf: &'a [u8], arena: &'a Arena, root: Value) -> Self {
        Dom { buf, arena, root }
    }

    pub fn root(&self) -> Value {
        self.root
    }

    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// Bytes of a string value, up to its NUL delimiter.
    pub fn str_bytes(&self, value: Value) -> &'a [u8] {
        self.str_bytes_at(value.str_offset())
    }

    /// A string value as `&str`. `None` when the content is not UTF-8,
    /// which the permissive unescaper can produce from lone surrogates or
    /// a `\u0000` escape.
    pub fn str_utf8(&self, value: Value) -> Option<&'a str> {
        std::str::from_utf8(self.str_bytes(value)).ok()
    }

    pub(crate) fn str_bytes_at(&self, offset: usize) -> &'a [u8] {
        let tail = &self.buf[offset..];
        let end = memchr(0, tail).unwrap_or(tail.len());
        &tail[..end]
    }

    /// Element values of an array, in document order. Non-array values
    /// yield nothing.
    pub fn elements(&self, array: Value) -> Elements<'a> {
        let next = match array.tag() {
            Tag::Array => array.first_node(),
            _ => None,
        };
        Elements { dom: *self, next }
    }

    /// Member names and values of an object, in document order. Non-object
    /// values yield nothing.
    pub fn members(&self, object: Value) -> Members<'a> {
        let next = match object.tag() {
            Tag::Object => object.first_node(),
            _ => None,
        };
        Members { dom: *self, next }
    }

    /// Number of nodes in a composite, walked in full.
    pub fn length(&self, composite: Value) -> usize {
        match composite.tag() {
            Tag::Array => self.elements(composite).count(),
            Tag::Object => self.members(composite).count(),
            _ => 0,
        }
    }

    /// Serialize the whole tree into `out`.
    pub fn write<S: ByteSink>(&self, out: &mut S, options: &EmitOptions) {
        encode::write_value(self, self.root, out, options);
    }

    pub fn dump_to_vec(&self, options: &EmitOptions) -> Vec<u8> {
        let mut sink = GrowingSink::new();
        self.write(&mut sink, options);
        sink.into_vec()
    }

    /// Serialize into a string. The output is valid UTF-8 whenever the
    /// parsed text was, NUL escapes aside.
    pub fn dump(&self, options: &EmitOptions) -> String {
        String::from_utf8(self.dump_to_vec(options)).expect("emitter output must be valid UTF-8")
    }

    /// Serialize into a caller slice, returning the size the output wants.
    /// A return beyond `out.len()` means the slice holds a truncated
    /// prefix.
    pub fn dump_to_slice(&self, out: &mut [u8], options: &EmitOptions) -> usize {
        let mut sink = BoundedSink::new(out);
        self.write(&mut sink, options);
        sink.len()
    }
}

/// Iterator over array element values.
pub struct Elements<'a> {
    dom: Dom<'a>,
    next: Option<NodeId>,
}

impl Iterator for Elements<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let node = self.dom.arena.array_node(self.next?);
        self.next = node.next;
        Some(node.value)
    }
}

/// Iterator over object members as name bytes and value.
pub struct Members<'a> {
    dom: Dom<'a>,
    next: Option<NodeId>,
}

impl<'a> Iterator for Members<'a> {
    type Item = (&'a [u8], Value);

    fn next(&mut self) -> Option<(&'a [u8], Value)> {
        let node = self.dom.arena.object_node(self.next?);
        self.next = node.next;
        Some((self.dom.str_bytes_at(node.name), node.value))
    }
}

/// Arena and buffer owner for repeated DOM parses.
#[derive(Debug)]
pub struct Document {
    arena: Arena,
    text: Vec<u8>,
    root: Value,
}

impl Document {
    pub fn new() -> Self {
        Document {
            arena: Arena::new(),
            text: Vec::new(),
            root: Value::NULL,
        }
    }

    /// Copy `text` in, NUL-terminate it and parse. The previous parse's
    /// nodes are recycled first.
    pub fn parse_text(&mut self, text: &str) -> Result<Value> {
        let mut buf = Vec::with_capacity(text.len() + 1);
        buf.extend_from_slice(text.as_bytes());
        buf.push(0);
        self.parse_vec(buf)
    }

    /// Take ownership of `buf` and parse it in place. A missing NUL
    /// terminator is appended.
    pub fn parse_vec(&mut self, mut buf: Vec<u8>) -> Result<Value> {
        if buf.last() != Some(&0) {
            buf.push(0);
        }
        self.arena.reset();
        self.root = Value::NULL;
        self.text = buf;
        let root = decode::parse(&mut self.text, &mut self.arena)?;
        self.root = root;
        Ok(root)
    }

    /// Root of the last successful parse, `NULL` otherwise.
    pub fn root(&self) -> Value {
        self.root
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn dom(&self) -> Dom<'_> {
        Dom::new(&self.text, &self.arena, self.root)
    }

    pub fn dump(&self, options: &EmitOptions) -> String {
        self.dom().dump(options)
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}
