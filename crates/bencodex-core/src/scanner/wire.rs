//! Token-level bencode grammar.
//!
//! This module recognises the two atomic tokens and identifies container
//! markers from their leading byte:
//!
//! - Integer: `i` [`-`] digit+ `e`
//! - Byte string: digit+ `:` byte{len}
//! - List: `l` value* `e`
//! - Dictionary: `d` (string value)* `e`
//!
//! Every read is bounds-checked against the input slice. A length prefix is
//! never trusted before the payload end has been compared with the buffer end.

use crate::error::{Error, ErrorKind, Result};
use crate::policy::Policy;
use std::fmt;

/// Physical token kinds, identified by their leading byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `i...e`
    Integer,
    /// `<len>:<bytes>`
    ByteString,
    /// `l...e`
    List,
    /// `d...e`
    Dict,
}

impl TokenKind {
    /// Classifies a value by its first byte
    pub fn from_lead(byte: u8) -> Option<Self> {
        match byte {
            b'i' => Some(TokenKind::Integer),
            b'0'..=b'9' => Some(TokenKind::ByteString),
            b'l' => Some(TokenKind::List),
            b'd' => Some(TokenKind::Dict),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Integer => "integer",
            TokenKind::ByteString => "byte string",
            TokenKind::List => "list",
            TokenKind::Dict => "dictionary",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan an integer token starting at the `i` under `cursor`.
///
/// Returns the offset just past the closing `e`.
pub fn scan_integer(input: &[u8], cursor: usize, policy: &Policy) -> Result<usize> {
    let mut position = cursor + 1;
    let negative = input.get(position) == Some(&b'-');
    if negative {
        position += 1;
    }

    let digits_start = position;
    while input.get(position).is_some_and(u8::is_ascii_digit) {
        position += 1;
    }
    let digits = &input[digits_start..position];

    match input.get(position) {
        Some(b'e') => {}
        Some(_) => return Err(Error::decode(ErrorKind::MalformedInteger, position)),
        None => return Err(Error::decode(ErrorKind::UnexpectedEnd, position)),
    }

    if digits.is_empty() {
        return Err(Error::decode(ErrorKind::MalformedInteger, cursor));
    }

    if digits[0] == b'0' {
        // "-0", and "-00" accepted literally under an ignoring policy, are both zero
        if negative && digits.iter().all(|&d| d == b'0') {
            return Err(Error::decode(ErrorKind::NegativeZero, cursor));
        }
        if digits.len() > 1 && policy.leading_zeros.is_error() {
            return Err(Error::decode(ErrorKind::LeadingZero, digits_start));
        }
    }

    Ok(position + 1)
}

/// Scan a byte-string length prefix starting at `cursor`.
///
/// Returns the declared length and the offset of the first payload byte.
/// A length too large for `usize` can never be satisfied by the buffer and is
/// reported as [`ErrorKind::UnexpectedEnd`].
pub fn scan_length(input: &[u8], cursor: usize, policy: &Policy) -> Result<(usize, usize)> {
    let mut position = cursor;
    let mut length: usize = 0;

    while let Some(&byte) = input.get(position) {
        if !byte.is_ascii_digit() {
            break;
        }
        length = length
            .checked_mul(10)
            .and_then(|l| l.checked_add(usize::from(byte - b'0')))
            .ok_or_else(|| Error::decode(ErrorKind::UnexpectedEnd, cursor))?;
        position += 1;
    }

    match input.get(position) {
        Some(b':') if position > cursor => {}
        Some(&byte) => return Err(Error::decode(ErrorKind::InvalidByte(byte), position)),
        None => return Err(Error::decode(ErrorKind::UnexpectedEnd, position)),
    }

    if position - cursor > 1 && input[cursor] == b'0' && policy.leading_zeros.is_error() {
        return Err(Error::decode(ErrorKind::LeadingZero, cursor));
    }

    Ok((length, position + 1))
}

/// Scan a complete byte string starting at `cursor`.
///
/// Returns the payload start and the offset just past the payload.
pub fn scan_byte_string(input: &[u8], cursor: usize, policy: &Policy) -> Result<(usize, usize)> {
    let (length, payload_start) = scan_length(input, cursor, policy)?;

    let end = payload_start
        .checked_add(length)
        .filter(|&end| end <= input.len())
        .ok_or_else(|| Error::decode(ErrorKind::UnexpectedEnd, payload_start))?;

    Ok((payload_start, end))
}

/// Numeric value of an already validated integer literal (`-`? digit+).
///
/// Returns `None` when the literal does not fit in an `i128`.
pub fn integer_value(literal: &[u8]) -> Option<i128> {
    let (negative, digits) = match literal.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, literal),
    };

    let mut value: i128 = 0;
    for &byte in digits {
        let digit = i128::from(byte.wrapping_sub(b'0'));
        value = value.checked_mul(10)?;
        // Accumulate negatives downwards so i128::MIN stays reachable
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
    }

    Some(value)
}
