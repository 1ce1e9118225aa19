//! Map container: the entries of one dictionary.
//!
//! Entries are kept in source order next to a lookup table from raw key bytes
//! to entry. When a key occurs more than once, lookups resolve to the **last**
//! occurrence; every occurrence stays visible through [`MapContainer::keys`]
//! and [`MapContainer::entries`]. With the default key-order policy repeated
//! keys never get that far, since a repeat is not strictly ascending.

use super::{Container, Decoder, Frame, Shape};
use super::{ScalarContainer, SequenceContainer};
use crate::convert::FromBencode;
use crate::error::{ErrorKind, Result};
use crate::path::{KeyPath, PathSegment};
use crate::scanner::{self, Span, Token};
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    key: &'a [u8],
    key_token: Token,
    value: Token,
}

/// View over a dictionary
#[derive(Debug)]
pub struct MapContainer<'a> {
    frame: Frame<'a>,
    token: Token,
    entries: Vec<Entry<'a>>,
    lookup: HashMap<&'a [u8], usize>,
}

impl<'a> MapContainer<'a> {
    pub(crate) fn new(frame: Frame<'a>, token: Token) -> Result<Self> {
        let mut entries = Vec::new();
        scanner::walk_dict(
            frame.input,
            token.span.start,
            &frame.policy,
            frame.depth,
            |key_token, key, value| {
                entries.push(Entry {
                    key,
                    key_token,
                    value,
                })
            },
        )
        .map_err(|e| e.under(&frame.path))?;

        for pair in entries.windows(2) {
            if pair[0].key >= pair[1].key {
                let offset = pair[1].key_token.span.start;
                if frame.policy.key_order.is_error() {
                    return Err(frame.error(ErrorKind::OutOfOrderKeys, offset));
                }
                debug!(
                    "Accepting out-of-order key at offset {} ({})",
                    offset, frame.path
                );
            }
        }

        let lookup = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.key, index))
            .collect();

        trace!(
            "Map at {}..{} has {} entries",
            token.span.start,
            token.span.end,
            entries.len()
        );

        Ok(Self {
            frame,
            token,
            entries,
            lookup,
        })
    }

    pub(crate) fn frame(&self) -> &Frame<'a> {
        &self.frame
    }

    pub(crate) fn token(&self) -> Token {
        self.token
    }

    /// Bytes covered by the dictionary, including `d` and `e`
    pub fn span(&self) -> Span {
        self.token.span
    }

    /// Path from the document root
    pub fn path(&self) -> &KeyPath {
        &self.frame.path
    }

    /// Number of entries in the source, counting repeated keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true for an empty dictionary
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the key is present
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.lookup.contains_key(key.as_ref())
    }

    /// Raw keys in source order
    pub fn keys(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    /// Every entry in source order, with a decoder for its value
    pub fn entries(&self) -> impl Iterator<Item = (&'a [u8], Decoder<'a>)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.key, self.entry_decoder(entry)))
    }

    /// Decoder for the value under `key`, failing with
    /// [`ErrorKind::KeyNotFound`] if absent
    pub fn decoder(&self, key: impl AsRef<[u8]>) -> Result<Decoder<'a>> {
        let key = key.as_ref();
        let index = self.lookup.get(key).copied().ok_or_else(|| {
            self.frame.error(
                ErrorKind::KeyNotFound(String::from_utf8_lossy(key).into_owned()),
                self.token.span.start,
            )
        })?;
        Ok(self.entry_decoder(&self.entries[index]))
    }

    /// Value under `key` as a container of the requested shape
    pub fn get(&self, key: impl AsRef<[u8]>, shape: Shape) -> Result<Container<'a>> {
        self.decoder(key)?.container(shape)
    }

    /// Value under `key`, which must be a scalar
    pub fn get_scalar(&self, key: impl AsRef<[u8]>) -> Result<ScalarContainer<'a>> {
        self.decoder(key)?.scalar()
    }

    /// Value under `key`, which must be a list
    pub fn get_sequence(&self, key: impl AsRef<[u8]>) -> Result<SequenceContainer<'a>> {
        self.decoder(key)?.sequence()
    }

    /// Value under `key`, which must be a dictionary
    pub fn get_map(&self, key: impl AsRef<[u8]>) -> Result<MapContainer<'a>> {
        self.decoder(key)?.map()
    }

    /// Decodes the value under `key` as `T`
    pub fn decode<T: FromBencode>(&self, key: impl AsRef<[u8]>) -> Result<T> {
        self.decoder(key)?.decode()
    }

    /// Decodes the value under `key` as `T`, or returns `None` if absent.
    ///
    /// The format has no null token, so an absent key is how an empty
    /// optional is represented.
    pub fn decode_optional<T: FromBencode>(&self, key: impl AsRef<[u8]>) -> Result<Option<T>> {
        let key = key.as_ref();
        if !self.contains(key) {
            return Ok(None);
        }
        self.decode(key).map(Some)
    }

    /// Keys, in source order, that are not listed in `known`
    pub fn unknown_keys<'k>(&'k self, known: &'k [&'k str]) -> impl Iterator<Item = &'a [u8]> + 'k {
        self.keys()
            .filter(move |key| !known.iter().any(|k| k.as_bytes() == *key))
    }

    /// Applies the unknown-key policy against the fields a schema expects.
    ///
    /// With [`Strategy::Error`](crate::Strategy::Error) the first unknown key
    /// fails with [`ErrorKind::UnknownKey`]; otherwise extras are ignored.
    pub fn check_unknown_keys(&self, known: &[&str]) -> Result<()> {
        let Some(first) = self
            .entries
            .iter()
            .find(|entry| !known.iter().any(|k| k.as_bytes() == entry.key))
        else {
            return Ok(());
        };

        if self.frame.policy.unknown_keys.is_error() {
            return Err(self.frame.error(
                ErrorKind::UnknownKey(String::from_utf8_lossy(first.key).into_owned()),
                first.key_token.span.start,
            ));
        }

        debug!(
            "Ignoring unknown key '{}' ({})",
            String::from_utf8_lossy(first.key),
            self.frame.path
        );
        Ok(())
    }

    fn entry_decoder(&self, entry: &Entry<'a>) -> Decoder<'a> {
        Decoder::from_parts(self.frame.child(PathSegment::key(entry.key)), entry.value)
    }
}
