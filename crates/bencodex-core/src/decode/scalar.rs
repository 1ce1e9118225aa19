//! Scalar container: one integer or byte string.

use super::{Container, Decoder, Frame, Shape};
use crate::error::{ErrorKind, Result};
use crate::path::KeyPath;
use crate::scanner::{self, Span, Token, TokenKind};

/// View over a single integer or byte string.
///
/// Every extraction method consumes the container, so a scalar can be read
/// exactly once.
#[derive(Debug)]
pub struct ScalarContainer<'a> {
    frame: Frame<'a>,
    token: Token,
}

impl<'a> ScalarContainer<'a> {
    pub(crate) fn new(frame: Frame<'a>, token: Token) -> Self {
        Self { frame, token }
    }

    pub(crate) fn frame(&self) -> &Frame<'a> {
        &self.frame
    }

    pub(crate) fn token(&self) -> Token {
        self.token
    }

    /// Physical kind of the scalar
    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    /// Bytes covered by the scalar, including its framing
    pub fn span(&self) -> Span {
        self.token.span
    }

    /// Path from the document root
    pub fn path(&self) -> &KeyPath {
        &self.frame.path
    }

    /// Parses the integer into `T`, failing with
    /// [`ErrorKind::IntegerOverflow`] if it does not fit.
    ///
    /// ```
    /// use bencodex_core::{Decoder, ErrorKind, Policy};
    ///
    /// let scalar = Decoder::new(b"i300e", Policy::new())?.scalar()?;
    /// assert_eq!(scalar.into_integer::<u16>()?, 300);
    ///
    /// let scalar = Decoder::new(b"i300e", Policy::new())?.scalar()?;
    /// let err = scalar.into_integer::<u8>().unwrap_err();
    /// assert_eq!(err.kind(), Some(&ErrorKind::IntegerOverflow("u8")));
    /// # Ok::<(), bencodex_core::Error>(())
    /// ```
    pub fn into_integer<T: TryFrom<i128>>(self) -> Result<T> {
        self.expect(TokenKind::Integer)?;

        let Span { start, end } = self.token.span;
        let literal = &self.frame.input[start + 1..end - 1];

        scanner::integer_value(literal)
            .and_then(|value| T::try_from(value).ok())
            .ok_or_else(|| {
                self.frame
                    .error(ErrorKind::IntegerOverflow(short_type_name::<T>()), start)
            })
    }

    /// Returns the raw payload of a byte string
    pub fn into_bytes(self) -> Result<&'a [u8]> {
        self.expect(TokenKind::ByteString)?;
        Ok(self.payload()?.slice(self.frame.input))
    }

    /// Returns the payload of a byte string as UTF-8 text
    pub fn into_text(self) -> Result<&'a str> {
        self.expect(TokenKind::ByteString)?;
        let payload = self.payload()?;
        std::str::from_utf8(payload.slice(self.frame.input))
            .map_err(|_| self.frame.error(ErrorKind::InvalidUtf8, payload.start))
    }

    /// Re-decodes the bytes of this scalar's own span as a container of the
    /// requested shape.
    ///
    /// The re-decoded value must cover the span exactly; anything left over
    /// is always [`ErrorKind::ExtraData`], whatever the trailing-data policy.
    /// This is the read side of [`ScalarBuilder::write_nested`].
    ///
    /// [`ScalarBuilder::write_nested`]: crate::ScalarBuilder::write_nested
    pub fn into_nested(self, shape: Shape) -> Result<Container<'a>> {
        let span = self.token.span;

        // The child may not read past the end of this span
        let bounded: &'a [u8] = &self.frame.input[..span.end];
        let (token, next) =
            scanner::delimit_at(bounded, span.start, &self.frame.policy, self.frame.depth)
                .map_err(|e| e.under(&self.frame.path))?;

        if next != span.end {
            return Err(self.frame.error(ErrorKind::ExtraData, next));
        }

        let frame = Frame {
            input: bounded,
            ..self.frame
        };
        Decoder::from_parts(frame, token).container(shape)
    }

    fn expect(&self, kind: TokenKind) -> Result<()> {
        if self.token.kind != kind {
            return Err(self.frame.shape_mismatch(kind.as_str(), &self.token));
        }
        Ok(())
    }

    fn payload(&self) -> Result<Span> {
        let (payload_start, end) =
            scanner::scan_byte_string(self.frame.input, self.token.span.start, &self.frame.policy)
                .map_err(|e| e.under(&self.frame.path))?;
        Ok(Span::new(payload_start, end))
    }
}

/// `core::num::NonZeroU8` -> `NonZeroU8`, `u8` -> `u8`
fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}
