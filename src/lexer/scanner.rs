//! Byte cursor over the SQL source

use bytes::Bytes;

/// Immutable source bytes with an end-of-input sentinel.
///
/// A single space is appended when the input does not already end in
/// whitespace. The last byte is the sentinel: reaching it means end of input,
/// and since it is whitespace no token can absorb it.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    bytes: Bytes,
    eof: usize,
}

impl SourceBuffer {
    pub fn new(input: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(input.len() + 1);
        buf.extend_from_slice(input);
        if !input.last().is_some_and(|b| b.is_ascii_whitespace()) {
            buf.push(b' ');
        }
        let eof = buf.len() - 1;
        Self { bytes: Bytes::from(buf), eof }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Index of the sentinel byte
    pub fn eof_index(&self) -> usize {
        self.eof
    }

    /// Zero-copy view of `start..end`
    pub fn slice(&self, start: usize, end: usize) -> Bytes {
        self.bytes.slice(start..end)
    }
}

/// Cursor state shared by all scanning routines
#[derive(Debug)]
pub struct ByteScanner {
    source: SourceBuffer,
    cur: usize,
    ch: u8,
    /// Reused for de-escaping quoted content
    scratch: Vec<u8>,
}

impl ByteScanner {
    pub fn new(source: SourceBuffer) -> Self {
        let ch = source.as_bytes()[0];
        Self {
            source,
            cur: 0,
            ch,
            scratch: Vec::with_capacity(64),
        }
    }

    pub fn source(&self) -> &SourceBuffer {
        &self.source
    }

    /// Current byte
    #[inline]
    pub fn ch(&self) -> u8 {
        self.ch
    }

    /// Current offset
    #[inline]
    pub fn pos(&self) -> usize {
        self.cur
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.cur == self.source.eof
    }

    /// Move one byte forward, stopping at the sentinel
    #[inline]
    pub fn advance(&mut self) -> u8 {
        if self.cur < self.source.eof {
            self.cur += 1;
        }
        self.ch = self.source.bytes[self.cur];
        self.ch
    }

    /// Byte `n` positions ahead; the sentinel once past the end
    #[inline]
    pub fn peek(&self, n: usize) -> u8 {
        let idx = (self.cur + n).min(self.source.eof);
        self.source.bytes[idx]
    }

    /// Move the cursor back to a previously seen offset
    pub fn reset(&mut self, pos: usize) {
        debug_assert!(pos <= self.source.eof);
        self.cur = pos;
        self.ch = self.source.bytes[pos];
    }

    pub fn bytes(&self, start: usize, end: usize) -> &[u8] {
        &self.source.bytes[start..end]
    }

    pub fn slice(&self, start: usize, end: usize) -> Bytes {
        self.source.slice(start, end)
    }

    pub fn scratch_clear(&mut self) {
        self.scratch.clear();
    }

    #[inline]
    pub fn scratch_push(&mut self, b: u8) {
        self.scratch.push(b);
    }

    /// Copy of the de-escaped content; the buffer itself stays with the scanner
    pub fn scratch_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_appended() {
        let src = SourceBuffer::new(b"SELECT");
        assert_eq!(src.as_bytes(), b"SELECT ");
        assert_eq!(src.eof_index(), 6);
    }

    #[test]
    fn test_trailing_whitespace_is_the_sentinel() {
        let src = SourceBuffer::new(b"SELECT\n");
        assert_eq!(src.as_bytes(), b"SELECT\n");
        assert_eq!(src.eof_index(), 6);
    }

    #[test]
    fn test_empty_input() {
        let scanner = ByteScanner::new(SourceBuffer::new(b""));
        assert!(scanner.at_eof());
    }

    #[test]
    fn test_advance_stops_at_sentinel() {
        let mut scanner = ByteScanner::new(SourceBuffer::new(b"ab"));
        assert_eq!(scanner.advance(), b'b');
        assert_eq!(scanner.advance(), b' ');
        assert!(scanner.at_eof());
        assert_eq!(scanner.advance(), b' ');
        assert_eq!(scanner.pos(), 2);
        assert_eq!(scanner.peek(10), b' ');
    }
}
