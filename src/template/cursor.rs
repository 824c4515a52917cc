//! Byte cursor over an immutable template document.

use memchr::{memchr, memmem};

/// Whitespace as the C locale defines it, vertical tab included.
pub(crate) fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

/// A read position inside a template document.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Unconsumed input.
    pub(crate) fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }

    /// Bytes between `start` and the current position.
    pub(crate) fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.input[start..self.pos]
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Byte at an absolute offset, if inside the document.
    pub(crate) fn byte_at(&self, index: usize) -> Option<u8> {
        self.input.get(index).copied()
    }

    pub(crate) fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.input.len());
    }

    /// Move to an absolute offset, clamped to the end of input.
    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    pub(crate) fn take_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if !pred(byte) {
                break;
            }
            self.pos += 1;
        }
        self.slice_from(start)
    }

    pub(crate) fn skip_whitespace(&mut self) {
        self.take_while(is_space);
    }

    /// Absolute offset of the next `needle` byte at or after the cursor.
    pub(crate) fn find(&self, needle: u8) -> Option<usize> {
        memchr(needle, self.remaining()).map(|offset| self.pos + offset)
    }

    /// Read one symbol token.
    ///
    /// Leading whitespace is skipped. A token starting with an alphanumeric
    /// byte runs until whitespace, `%` or end of input; any other byte is a
    /// token on its own, which is how the `=` output marker is split from the
    /// name that follows it. A `%` is never part of a token, so an empty tag
    /// yields an empty token and leaves its `%>` in place.
    pub(crate) fn read_symbol(&mut self) -> &'a [u8] {
        self.skip_whitespace();
        match self.peek() {
            None | Some(b'%') => &[],
            Some(byte) if byte.is_ascii_alphanumeric() => {
                self.take_while(|b| !is_space(b) && b != b'%')
            }
            Some(_) => {
                let start = self.pos;
                self.advance(1);
                self.slice_from(start)
            }
        }
    }

    /// Move past the next `%>` marker, or to the end when the tag is never closed.
    pub(crate) fn skip_past_close(&mut self) {
        match memmem::find(self.remaining(), b"%>") {
            Some(offset) => self.advance(offset + 2),
            None => self.seek(self.input.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_symbol_splits_output_marker() {
        let mut cursor = Cursor::new(b"  =gpio.4 %>");
        assert_eq!(cursor.read_symbol(), b"=");
        assert_eq!(cursor.read_symbol(), b"gpio.4");
        assert_eq!(cursor.peek(), Some(b' '));
    }

    #[test]
    fn test_read_symbol_stops_at_percent() {
        let mut cursor = Cursor::new(b"EndIf%>");
        assert_eq!(cursor.read_symbol(), b"EndIf");
        assert_eq!(cursor.remaining(), b"%>");
    }

    #[test]
    fn test_read_symbol_leaves_close_marker() {
        let mut cursor = Cursor::new(b"  %>after");
        assert!(cursor.read_symbol().is_empty());
        assert_eq!(cursor.remaining(), b"%>after");

        let mut cursor = Cursor::new(b"= %>");
        assert_eq!(cursor.read_symbol(), b"=");
        assert!(cursor.read_symbol().is_empty());
        assert_eq!(cursor.remaining(), b"%>");
    }

    #[test]
    fn test_read_symbol_at_end_is_empty() {
        let mut cursor = Cursor::new(b" \t\x0b");
        assert!(cursor.read_symbol().is_empty());
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_skip_past_close() {
        let mut cursor = Cursor::new(b" name %>tail");
        cursor.skip_past_close();
        assert_eq!(cursor.remaining(), b"tail");

        let mut unclosed = Cursor::new(b" name");
        unclosed.skip_past_close();
        assert!(unclosed.is_at_end());
    }

    #[test]
    fn test_find_is_absolute() {
        let mut cursor = Cursor::new(b"a%b%c");
        cursor.advance(2);
        assert_eq!(cursor.find(b'%'), Some(3));
        assert_eq!(cursor.byte_at(3), Some(b'%'));
    }
}
