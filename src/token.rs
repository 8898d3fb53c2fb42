//! Token stream (spec.md §4.2).
//!
//! Converts the indexer's tape into a sequence of typed tokens. Left/right
//! parenthesis entries never escape this layer -- they only toggle the
//! "grouped" state tracked on [`crate::input::InputFile`].

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Contiguous,
    Quoted,
    LineFeed,
    EndOfFile,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range into the owning `InputFile`'s buffer. Meaningless for
    /// `LineFeed`/`EndOfFile`.
    pub text: Range<usize>,
    /// For `LineFeed`, the number of physical newlines this token stands
    /// for (CR+LF counts once; newlines deferred from a quoted string or an
    /// escaped line continuation are folded in).
    pub newlines: u32,
}

impl Token {
    pub fn eof() -> Self {
        Token { kind: TokenKind::EndOfFile, text: 0..0, newlines: 0 }
    }

    pub fn line_feed(newlines: u32) -> Self {
        Token { kind: TokenKind::LineFeed, text: 0..0, newlines }
    }

    pub fn is_dollar(&self, buf: &[u8]) -> bool {
        self.kind == TokenKind::Contiguous && buf[self.text.clone()].first() == Some(&b'$')
    }
}
