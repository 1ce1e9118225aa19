//! Map builder: dictionary entries, sorted at finalize time.

use super::{write_byte_string, Context, Encoder, ScalarBuilder, SequenceBuilder};
use crate::convert::ToBencode;
use crate::error::{ErrorKind, Result};
use crate::path::{KeyPath, PathSegment};
use std::collections::hash_map::{Entry, HashMap};
use tracing::trace;

/// Builds a dictionary.
///
/// Entries may be inserted in any order; they are written in ascending byte
/// order of their keys. Entries whose value is absent are left out.
#[derive(Debug)]
pub struct MapBuilder {
    context: Context,
    entries: HashMap<Vec<u8>, Encoder>,
}

impl MapBuilder {
    pub(crate) fn new(context: Context) -> Self {
        Self {
            context,
            entries: HashMap::new(),
        }
    }

    /// Path from the document root
    pub fn path(&self) -> &KeyPath {
        &self.context.path
    }

    /// Number of keys inserted so far, including absent values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` has been inserted
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.entries.contains_key(key.as_ref())
    }

    /// Inserts a scalar under `key`
    pub fn insert_scalar(&mut self, key: impl AsRef<[u8]>) -> Result<&mut ScalarBuilder> {
        Ok(self.insert_child(key.as_ref())?.scalar())
    }

    /// Inserts a list under `key`
    pub fn insert_sequence(&mut self, key: impl AsRef<[u8]>) -> Result<&mut SequenceBuilder> {
        self.insert_child(key.as_ref())?.sequence()
    }

    /// Inserts a dictionary under `key`
    pub fn insert_map(&mut self, key: impl AsRef<[u8]>) -> Result<&mut MapBuilder> {
        self.insert_child(key.as_ref())?.map()
    }

    /// Inserts `value` under `key` through its [`ToBencode`] implementation.
    ///
    /// A value that writes nothing, such as `None`, leaves the key out of
    /// the output.
    pub fn insert<T: ToBencode + ?Sized>(&mut self, key: impl AsRef<[u8]>, value: &T) -> Result<()> {
        let key = key.as_ref();
        let result = self.insert_child(key)?.encode(value);
        if result.is_err() {
            // A failed value leaves its key free
            self.entries.remove(key);
        }
        result
    }

    fn insert_child(&mut self, key: &[u8]) -> Result<&mut Encoder> {
        match self.entries.entry(key.to_vec()) {
            Entry::Occupied(_) => Err(self
                .context
                .child(PathSegment::key(key))
                .error(ErrorKind::AlreadyEncoded)),
            Entry::Vacant(slot) => {
                let context = self.context.child(PathSegment::key(key));
                Ok(slot.insert(Encoder::from_context(context)))
            }
        }
    }

    pub(crate) fn finalize(self, out: &mut Vec<u8>) -> Result<()> {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        trace!("Writing {} map entries ({})", entries.len(), self.context.path);

        out.push(b'd');
        for (key, value) in entries {
            let mark = out.len();
            write_byte_string(out, &key);
            if !value.finish_present(out)? {
                out.truncate(mark);
            }
        }
        out.push(b'e');
        Ok(())
    }
}
