//! Byte cursor for efficient input navigation

use memchr::{memchr, memchr_iter, memmem, memrchr};

use crate::error::Pos;

/// Cursor for navigating byte input with position tracking
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    /// Create cursor from byte slice
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Get current byte without consuming
    pub fn current(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte ahead without consuming
    pub fn peek(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos.saturating_add(ahead)).copied()
    }

    /// Check whether the remaining input starts with `pattern`
    pub fn starts_with(&self, pattern: &[u8]) -> bool {
        self.remaining().starts_with(pattern)
    }

    /// Advance cursor by one byte
    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    /// Advance cursor by `n` bytes, clamped to the end of input
    pub fn advance_by(&mut self, n: usize) {
        let end = self.pos.saturating_add(n).min(self.input.len());
        let skipped = self.input.get(self.pos..end).unwrap_or_default();

        let newlines = memchr_iter(b'\n', skipped).count();
        if newlines > 0 {
            self.line = self
                .line
                .saturating_add(u32::try_from(newlines).unwrap_or(u32::MAX));
            let after_last = memrchr(b'\n', skipped).map_or(0, |idx| skipped.len() - idx - 1);
            self.col = u32::try_from(after_last)
                .unwrap_or(u32::MAX)
                .saturating_add(1);
        } else {
            self.col = self
                .col
                .saturating_add(u32::try_from(skipped.len()).unwrap_or(u32::MAX));
        }
        self.pos = end;
    }

    /// Offset of the next `byte` relative to the current position
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.remaining())
    }

    /// Offset of the next `pattern` relative to the current position
    pub fn find(&self, pattern: &[u8]) -> Option<usize> {
        memmem::find(self.remaining(), pattern)
    }

    /// Skip whitespace
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(b) = self.current() {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.advance();
            } else {
                break;
            }
        }
        self.pos > start
    }

    /// Consume byte if it matches
    pub fn consume(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Get current position
    pub const fn position(&self) -> Pos {
        Pos::new(self.pos, self.line, self.col)
    }

    /// Check if at end of input
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Get current position index
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Get slice from start to current position
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}
