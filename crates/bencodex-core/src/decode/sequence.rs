//! Sequence container: the direct children of one list.

use super::{Container, Decoder, Frame, MapContainer, ScalarContainer, Shape};
use crate::convert::FromBencode;
use crate::error::{ErrorKind, Result};
use crate::path::{KeyPath, PathSegment};
use crate::scanner::{self, Span, Token};
use tracing::trace;

/// View over a list.
///
/// The children are delimited by a single forward scan when the container is
/// built, so [`len`](Self::len) is known immediately. They are handed out in
/// order and an element cannot be read twice.
#[derive(Debug)]
pub struct SequenceContainer<'a> {
    frame: Frame<'a>,
    token: Token,
    items: Vec<Token>,
    index: usize,
}

impl<'a> SequenceContainer<'a> {
    pub(crate) fn new(frame: Frame<'a>, token: Token) -> Result<Self> {
        let mut items = Vec::new();
        scanner::walk_list(
            frame.input,
            token.span.start,
            &frame.policy,
            frame.depth,
            |child| items.push(child),
        )
        .map_err(|e| e.under(&frame.path))?;

        trace!(
            "Sequence at {}..{} has {} elements",
            token.span.start,
            token.span.end,
            items.len()
        );

        Ok(Self {
            frame,
            token,
            items,
            index: 0,
        })
    }

    pub(crate) fn frame(&self) -> &Frame<'a> {
        &self.frame
    }

    pub(crate) fn token(&self) -> Token {
        self.token
    }

    /// Bytes covered by the list, including `l` and `e`
    pub fn span(&self) -> Span {
        self.token.span
    }

    /// Path from the document root
    pub fn path(&self) -> &KeyPath {
        &self.frame.path
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true for an empty list
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the element the next call will return
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Returns true once every element has been handed out
    pub fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    /// Advances to the next element and returns a decoder for it
    pub fn next_decoder(&mut self) -> Result<Decoder<'a>> {
        let Some(&token) = self.items.get(self.index) else {
            return Err(self
                .frame
                .error(ErrorKind::UnexpectedEnd, self.token.span.end - 1));
        };

        let frame = self.frame.child(PathSegment::Index(self.index));
        self.index += 1;
        Ok(Decoder::from_parts(frame, token))
    }

    /// Advances to the next element and returns it as a container of the
    /// requested shape.
    ///
    /// The element is consumed even when its shape does not match.
    pub fn next_container(&mut self, shape: Shape) -> Result<Container<'a>> {
        self.next_decoder()?.container(shape)
    }

    /// Advances to the next element, which must be a scalar
    pub fn next_scalar(&mut self) -> Result<ScalarContainer<'a>> {
        self.next_decoder()?.scalar()
    }

    /// Advances to the next element, which must be a list
    pub fn next_sequence(&mut self) -> Result<SequenceContainer<'a>> {
        self.next_decoder()?.sequence()
    }

    /// Advances to the next element, which must be a dictionary
    pub fn next_map(&mut self) -> Result<MapContainer<'a>> {
        self.next_decoder()?.map()
    }

    /// Advances to the next element and decodes it as `T`
    pub fn decode_next<T: FromBencode>(&mut self) -> Result<T> {
        self.next_decoder()?.decode()
    }
}
