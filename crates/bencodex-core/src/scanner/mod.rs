//! Grammar scanner delimiting complete values without materializing them.
//!
//! [`delimit`] starts at a cursor and returns the [`Token`] covering "the next
//! complete value" together with the advanced cursor. Containers are walked
//! recursively so that a returned span is always balanced, but none of the
//! nested content is interpreted or copied.
//!
//! ## Safety Against Adversarial Input
//!
//! - Length prefixes are compared against the buffer end before any payload
//!   byte is touched
//! - Nesting is bounded by [`Policy::max_depth`]; deeper documents fail with
//!   [`ErrorKind::NestingTooDeep`] instead of exhausting the stack
//! - All work is linear in the size of the scanned span
//!
//! ```
//! use bencodex_core::scanner::{delimit, TokenKind};
//! use bencodex_core::Policy;
//!
//! let input = b"l4:spami42eetrailing";
//! let (token, next) = delimit(input, 0, &Policy::new())?;
//! assert_eq!(token.kind, TokenKind::List);
//! assert_eq!(token.span.range(), 0..12);
//! assert_eq!(next, 12);
//! # Ok::<(), bencodex_core::Error>(())
//! ```

mod wire;

use crate::error::{Error, ErrorKind, Result};
use crate::path::PathSegment;
use crate::policy::Policy;
use std::ops::Range;

pub use wire::{integer_value, scan_byte_string, scan_integer, scan_length, TokenKind};

/// Half-open `[start, end)` byte range into the root input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First byte of the value
    pub start: usize,
    /// One past the last byte of the value
    pub end: usize,
}

impl Span {
    /// Creates a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-length span
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The span as a `Range`
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Borrows the spanned bytes from the buffer the span was taken from
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.range()]
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.range()
    }
}

/// One complete value: its kind and where it lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// Kind of value, from its leading byte
    pub kind: TokenKind,
    /// Bytes covered by the value
    pub span: Span,
}

/// Delimit the value starting at `cursor`.
///
/// Returns the value's token and the offset just past it. The caller decides
/// whether bytes after it are acceptable.
pub fn delimit(input: &[u8], cursor: usize, policy: &Policy) -> Result<(Token, usize)> {
    delimit_at(input, cursor, policy, 0)
}

/// Delimit the value at `cursor`, which sits at nesting level `depth`
pub(crate) fn delimit_at(
    input: &[u8],
    cursor: usize,
    policy: &Policy,
    depth: usize,
) -> Result<(Token, usize)> {
    let Some(&lead) = input.get(cursor) else {
        return Err(Error::decode(ErrorKind::UnexpectedEnd, cursor));
    };
    let kind = TokenKind::from_lead(lead)
        .ok_or_else(|| Error::decode(ErrorKind::InvalidByte(lead), cursor))?;

    let next = match kind {
        TokenKind::Integer => scan_integer(input, cursor, policy)?,
        TokenKind::ByteString => scan_byte_string(input, cursor, policy)?.1,
        TokenKind::List => walk_list(input, cursor, policy, depth, |_| {})?,
        TokenKind::Dict => walk_dict(input, cursor, policy, depth, |_, _, _| {})?,
    };

    Ok((
        Token {
            kind,
            span: Span::new(cursor, next),
        },
        next,
    ))
}

fn enter(cursor: usize, policy: &Policy, depth: usize) -> Result<()> {
    if depth >= policy.max_depth {
        return Err(Error::decode(
            ErrorKind::NestingTooDeep(policy.max_depth),
            cursor,
        ));
    }
    Ok(())
}

/// Walk the list whose `l` sits at `cursor`, reporting each direct child.
///
/// Returns the offset just past the closing `e`.
pub(crate) fn walk_list(
    input: &[u8],
    cursor: usize,
    policy: &Policy,
    depth: usize,
    mut visit: impl FnMut(Token),
) -> Result<usize> {
    enter(cursor, policy, depth)?;

    let mut position = cursor + 1;
    let mut index = 0;

    loop {
        match input.get(position) {
            None => return Err(Error::decode(ErrorKind::UnterminatedList, cursor)),
            Some(b'e') => return Ok(position + 1),
            Some(_) => {
                let (token, next) = delimit_at(input, position, policy, depth + 1)
                    .map_err(|e| e.within(PathSegment::Index(index)))?;
                visit(token);
                position = next;
                index += 1;
            }
        }
    }
}

/// Walk the dictionary whose `d` sits at `cursor`, reporting each entry as
/// (key token, key payload, value token) in source order.
///
/// Key order is not checked here; that is the map container's job.
pub(crate) fn walk_dict<'a>(
    input: &'a [u8],
    cursor: usize,
    policy: &Policy,
    depth: usize,
    mut visit: impl FnMut(Token, &'a [u8], Token),
) -> Result<usize> {
    enter(cursor, policy, depth)?;

    let mut position = cursor + 1;

    loop {
        let lead = match input.get(position) {
            None => return Err(Error::decode(ErrorKind::UnterminatedDict, cursor)),
            Some(b'e') => return Ok(position + 1),
            Some(&byte) => byte,
        };

        if !lead.is_ascii_digit() {
            return Err(Error::decode(ErrorKind::MalformedKey, position));
        }

        let (payload_start, key_end) = scan_byte_string(input, position, policy)?;
        let key = Token {
            kind: TokenKind::ByteString,
            span: Span::new(position, key_end),
        };
        let key_bytes = &input[payload_start..key_end];

        // A key must be followed by its value, never by the terminator
        if matches!(input.get(key_end), None | Some(b'e')) {
            return Err(Error::decode(ErrorKind::UnterminatedDict, key_end)
                .within(PathSegment::key(key_bytes)));
        }

        let (value, next) = delimit_at(input, key_end, policy, depth + 1)
            .map_err(|e| e.within(PathSegment::key(key_bytes)))?;
        visit(key, key_bytes, value);
        position = next;
    }
}
