//! In-situ JSON DOM.
//!
//! The parser consumes a mutable, NUL-terminated byte buffer in one pass,
//! unescaping strings back into the buffer itself, and builds a tree of
//! NaN-boxed values whose nodes live in a reusable block arena. The emitter
//! walks the tree back out as compact or formatted JSON with shortest
//! round-trip doubles.
//!
//! # Examples
//!
//! Parse and serialize through a [`Document`], which owns the buffer and
//! the arena:
//!
//! ```rust
//! use situjson::{Document, EmitOptions};
//!
//! let mut doc = Document::new();
//! doc.parse_text(r#"{"name":"zen","tags":[1,2]}"#)?;
//! assert_eq!(doc.dump(&EmitOptions::new()), r#"{"name":"zen","tags":[1,2]}"#);
//! # Ok::<(), situjson::Error>(())
//! ```
//!
//! Read values through the borrowed [`Dom`] view:
//!
//! ```rust
//! use situjson::{Document, Tag};
//!
//! let mut doc = Document::new();
//! let root = doc.parse_text(r#"{"xs":[1,2.5,"three"]}"#)?;
//! let dom = doc.dom();
//! let (name, xs) = dom.members(root).next().unwrap();
//! assert_eq!(name, b"xs");
//! let kinds: Vec<Tag> = dom.elements(xs).map(|v| v.tag()).collect();
//! assert_eq!(kinds, [Tag::Int, Tag::Number, Tag::String]);
//! # Ok::<(), situjson::Error>(())
//! ```
//!
//! Or manage the buffer and arena yourself; the tree borrows both:
//!
//! ```rust
//! use situjson::{parse, Arena, Dom, EmitOptions};
//!
//! let mut arena = Arena::new();
//! let mut buf = b"[0.1, 1e100, -3.14]\0".to_vec();
//! let root = parse(&mut buf, &mut arena)?;
//! let dom = Dom::new(&buf, &arena, root);
//! assert_eq!(dom.dump(&EmitOptions::new()), "[0.1,1e100,-3.14]");
//! # Ok::<(), situjson::Error>(())
//! ```

pub mod arena;
pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod num;
pub mod value;

pub use crate::arena::{Arena, ArrayNode, NodeId, ObjectNode, BLOCK_SIZE};
pub use crate::decode::{parse, MAX_DEPTH};
pub use crate::document::{Document, Dom, Elements, Members};
pub use crate::encode::{write_value, BoundedSink, ByteSink, EmitOptions, GrowingSink};
pub use crate::error::Error;
pub use crate::value::{Tag, Value};

pub type Result<T> = std::result::Result<T, Error>;
