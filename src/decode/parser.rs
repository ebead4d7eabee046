//! Iterative tree builder.
//!
//! One pass over the buffer, no recursion. Each open composite keeps a frame
//! on a fixed stack holding the expected close bracket and the tail of a
//! temporarily circular node chain: the tail's `next` points at the head, so
//! appending is one link swap. Closing a frame breaks the cycle and the head
//! becomes the composite's payload.

use memchr::memchr3;

use crate::arena::{Arena, NodeId};
use crate::decode::string::unescape_in_place;
use crate::decode::tables::{matches, pow10, DIGIT, NUMBER, WHITESPACE};
use crate::error::Error;
use crate::value::Value;
use crate::Result;

/// Deepest accepted nesting of arrays and objects.
pub const MAX_DEPTH: usize = 32;

/// Parse a NUL-terminated JSON buffer into a value tree.
///
/// The buffer is rewritten in place: every string is unescaped where it
/// stands and NUL-delimited, and the returned tree refers to it by offset.
/// The buffer must stay alive and untouched for as long as the tree is read.
/// On error the arena keeps whatever nodes were built; reset it before the
/// next parse.
pub fn parse(buf: &mut [u8], arena: &mut Arena) -> Result<Value> {
    if buf.is_empty() || buf[buf.len() - 1] != 0 {
        return Err(Error::BreakingBad);
    }
    Parser { buf, pos: 0, arena }.run()
}

#[derive(Clone, Copy)]
struct Frame {
    /// Last node appended to this composite, `next` pointing at the head.
    tail: Option<NodeId>,
    /// `]` or `}`.
    end: u8,
}

struct Parser<'a> {
    buf: &'a mut [u8],
    pos: usize,
    arena: &'a mut Arena,
}

impl Parser<'_> {
    #[inline]
    fn peek(&self) -> u8 {
        self.buf[self.pos]
    }

    /// Skip whitespace and `//` line comments. Stops at the terminator.
    fn skip_whitespace(&mut self) {
        loop {
            while self.peek() != 0 && matches(self.peek(), WHITESPACE) {
                self.pos += 1;
            }
            if self.peek() != b'/' || self.buf[self.pos + 1] != b'/' {
                return;
            }
            self.pos += 2;
            let rest = &self.buf[self.pos..];
            self.pos += memchr3(0, b'\n', b'\r', rest).unwrap_or(rest.len() - 1);
        }
    }

    fn run(&mut self) -> Result<Value> {
        let mut stack = [Frame { tail: None, end: 0 }; MAX_DEPTH];
        let mut depth: usize;

        self.skip_whitespace();
        let mut ch = self.peek();
        if ch != b'{' && ch != b'[' {
            return Err(Error::BadRoot);
        }
        stack[0] = Frame {
            tail: None,
            end: ch + 2,
        };
        depth = 1;
        self.pos += 1;

        loop {
            self.skip_whitespace();
            ch = self.peek();
            if ch == b',' {
                if stack[depth - 1].tail.is_none() {
                    return Err(Error::MismatchBracket);
                }
                self.pos += 1;
                self.skip_whitespace();
                ch = self.peek();
                if ch == stack[depth - 1].end {
                    // dangling comma
                    return Err(Error::MismatchBracket);
                }
            } else if stack[depth - 1].tail.is_some() && ch != stack[depth - 1].end {
                return Err(Error::MismatchBracket);
            }

            while ch == stack[depth - 1].end {
                self.pos += 1;
                loop {
                    if depth == 0 {
                        return Err(Error::StackUnderflow);
                    }
                    depth -= 1;
                    let closed = self.seal_list(stack[depth]);
                    if depth == 0 {
                        return Ok(closed);
                    }
                    let parent = stack[depth - 1];
                    let tail = parent.tail.expect("closed frame always has a parent node");
                    self.set_node_value(parent.end, tail, closed);

                    self.skip_whitespace();
                    if self.peek() == b',' {
                        self.pos += 1;
                        self.skip_whitespace();
                        ch = self.peek();
                        if ch == stack[depth - 1].end {
                            return Err(Error::MismatchBracket);
                        }
                        break;
                    }
                    if self.peek() != stack[depth - 1].end {
                        return Err(Error::MismatchBracket);
                    }
                    self.pos += 1;
                }
            }

            // new element in the current frame
            let end = stack[depth - 1].end;
            let node;
            if end == b']' {
                node = self.arena.alloc_array_node().ok_or(Error::OutOfMemory)?;
                stack[depth - 1].tail = Some(self.link_array_tail(stack[depth - 1].tail, node));
            } else {
                node = self.arena.alloc_object_node().ok_or(Error::OutOfMemory)?;
                stack[depth - 1].tail = Some(self.link_object_tail(stack[depth - 1].tail, node));

                if ch != b'"' {
                    return Err(Error::UnexpectedCharacter);
                }
                self.pos += 1;
                let name = self.pos;
                self.pos = unescape_in_place(self.buf, self.pos)?;
                self.arena.object_node_mut(node).name = name;

                self.skip_whitespace();
                if self.peek() != b':' {
                    return Err(Error::UnexpectedCharacter);
                }
                self.pos += 1;
                self.skip_whitespace();
                ch = self.peek();
            }

            match ch {
                b'{' | b'[' => {
                    self.pos += 1;
                    if depth == MAX_DEPTH {
                        return Err(Error::StackOverflow);
                    }
                    stack[depth] = Frame {
                        tail: None,
                        end: ch + 2,
                    };
                    depth += 1;
                }
                b'"' => {
                    self.pos += 1;
                    let value = Value::string(self.pos);
                    self.pos = unescape_in_place(self.buf, self.pos)?;
                    self.set_node_value(end, node, value);
                }
                b'n' => {
                    if !self.buf[self.pos..].starts_with(b"null") {
                        return Err(Error::BadIdentifier);
                    }
                    self.pos += 4;
                    self.set_node_value(end, node, Value::NULL);
                }
                b't' => {
                    if !self.buf[self.pos..].starts_with(b"true") {
                        return Err(Error::BadIdentifier);
                    }
                    self.pos += 4;
                    self.set_node_value(end, node, Value::TRUE);
                }
                b'f' => {
                    if !self.buf[self.pos..].starts_with(b"false") {
                        return Err(Error::BadIdentifier);
                    }
                    self.pos += 5;
                    self.set_node_value(end, node, Value::FALSE);
                }
                b'0'..=b'9' | b'-' | b'.' => {
                    let value = self.parse_number()?;
                    self.set_node_value(end, node, value);
                }
                _ => return Err(Error::BreakingBad),
            }
        }
    }

    /// Append `node` behind `tail`, keeping the chain circular.
    fn link_array_tail(&mut self, tail: Option<NodeId>, node: NodeId) -> NodeId {
        match tail {
            None => self.arena.array_node_mut(node).next = Some(node),
            Some(t) => {
                let head = self.arena.array_node(t).next;
                self.arena.array_node_mut(node).next = head;
                self.arena.array_node_mut(t).next = Some(node);
            }
        }
        node
    }

    fn link_object_tail(&mut self, tail: Option<NodeId>, node: NodeId) -> NodeId {
        match tail {
            None => self.arena.object_node_mut(node).next = Some(node),
            Some(t) => {
                let head = self.arena.object_node(t).next;
                self.arena.object_node_mut(node).next = head;
                self.arena.object_node_mut(t).next = Some(node);
            }
        }
        node
    }

    /// Break the tail cycle and build the composite value.
    fn seal_list(&mut self, frame: Frame) -> Value {
        if frame.end == b'}' {
            let head = frame
                .tail
                .and_then(|t| self.arena.object_node_mut(t).next.take());
            Value::object(head)
        } else {
            let head = frame
                .tail
                .and_then(|t| self.arena.array_node_mut(t).next.take());
            Value::array(head)
        }
    }

    #[inline]
    fn set_node_value(&mut self, end: u8, node: NodeId, value: Value) {
        if end == b'}' {
            self.arena.object_node_mut(node).value = value;
        } else {
            self.arena.array_node_mut(node).value = value;
        }
    }

    /// Integer fast path: at most nine digits into an i32. Anything longer,
    /// or a dot or exponent, folds on into a double scaled by one pow10
    /// multiply.
    fn parse_number(&mut self) -> Result<Value> {
        let negative = self.peek() == b'-';
        if negative {
            self.pos += 1;
        }
        let mut ch = self.peek();
        let mut n32: i32 = 0;
        let mut digits = 0;
        while digits < 9 && matches(ch, DIGIT) {
            n32 = n32 * 10 + (ch - b'0') as i32;
            digits += 1;
            self.pos += 1;
            ch = self.peek();
        }
        if !matches(ch, NUMBER) {
            return Ok(Value::int(if negative { -n32 } else { n32 }));
        }

        let mut d = n32 as f64;
        let mut exponent: i64 = 0;
        while matches(ch, DIGIT) {
            d = d * 10.0 + (ch - b'0') as f64;
            self.pos += 1;
            ch = self.peek();
        }
        if ch == b'.' {
            self.pos += 1;
            ch = self.peek();
            while matches(ch, DIGIT) {
                exponent -= 1;
                d = d * 10.0 + (ch - b'0') as f64;
                self.pos += 1;
                ch = self.peek();
            }
        }
        if ch == b'e' || ch == b'E' {
            self.pos += 1;
            ch = self.peek();
            let mut negative_e = false;
            if ch == b'-' {
                negative_e = true;
                self.pos += 1;
                ch = self.peek();
            } else if ch == b'+' {
                self.pos += 1;
                ch = self.peek();
            }
            let mut exp: i32 = 0;
            while matches(ch, DIGIT) {
                if exp >= 214_748_364 {
                    return Err(Error::BadNumber);
                }
                exp = exp * 10 + (ch - b'0') as i32;
                self.pos += 1;
                ch = self.peek();
            }
            exponent += if negative_e { -exp as i64 } else { exp as i64 };
        }
        if exponent != 0 && d != 0.0 {
            d *= pow10(exponent);
        }
        if negative {
            d = -d;
        }
        Ok(Value::number(d))
    }
}
