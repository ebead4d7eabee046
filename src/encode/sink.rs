//! Output sinks for the emitter.

/// Byte-oriented destination the emitter writes through.
pub trait ByteSink {
    fn write_bytes(&mut self, bytes: &[u8]);

    fn write_byte(&mut self, byte: u8);

    fn write_tabs(&mut self, n: usize) {
        for _ in 0..n {
            self.write_byte(b'\t');
        }
    }
}

/// Initial reservation of [`GrowingSink`], enough for small documents to
/// avoid the first few reallocations.
pub const GROWING_SINK_RESERVE: usize = 256;

/// Unbounded sink over an owned vector.
#[derive(Debug)]
pub struct GrowingSink {
    buf: Vec<u8>,
}

impl GrowingSink {
    pub fn new() -> Self {
        GrowingSink {
            buf: Vec::with_capacity(GROWING_SINK_RESERVE),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for GrowingSink {
    fn default() -> Self {
        GrowingSink::new()
    }
}

impl ByteSink for GrowingSink {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    fn write_tabs(&mut self, n: usize) {
        let len = self.buf.len();
        self.buf.resize(len + n, b'\t');
    }
}

/// Bounded sink over a caller slice. Writes past the end are dropped but
/// still counted, so the requested size is always known; compare [`len`]
/// against [`capacity`] to detect truncation.
///
/// [`len`]: BoundedSink::len
/// [`capacity`]: BoundedSink::capacity
#[derive(Debug)]
pub struct BoundedSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> BoundedSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        BoundedSink { buf, len: 0 }
    }

    /// Bytes requested so far, clipped or not.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn truncated(&self) -> bool {
        self.len > self.buf.len()
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl ByteSink for BoundedSink<'_> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        // a run that does not fit whole is dropped whole
        if self.len + bytes.len() <= self.buf.len() {
            self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        }
        self.len += bytes.len();
    }

    fn write_byte(&mut self, byte: u8) {
        if self.len < self.buf.len() {
            self.buf[self.len] = byte;
        }
        self.len += 1;
    }

    fn write_tabs(&mut self, n: usize) {
        if self.len + n <= self.buf.len() {
            self.buf[self.len..self.len + n].fill(b'\t');
        }
        self.len += n;
    }
}
