//! Sequence builder: list children in append order.

use super::{Context, Encoder, MapBuilder, ScalarBuilder};
use crate::convert::ToBencode;
use crate::error::Result;
use crate::path::{KeyPath, PathSegment};

/// Builds a list. Children are emitted in the order they were appended.
#[derive(Debug)]
pub struct SequenceBuilder {
    context: Context,
    items: Vec<Encoder>,
}

impl SequenceBuilder {
    pub(crate) fn new(context: Context) -> Self {
        Self {
            context,
            items: Vec::new(),
        }
    }

    /// Path from the document root
    pub fn path(&self) -> &KeyPath {
        &self.context.path
    }

    /// Number of children appended so far
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a scalar child
    pub fn push_scalar(&mut self) -> &mut ScalarBuilder {
        self.push_child().scalar()
    }

    /// Appends a list child
    pub fn push_sequence(&mut self) -> Result<&mut SequenceBuilder> {
        self.push_child().sequence()
    }

    /// Appends a dictionary child
    pub fn push_map(&mut self) -> Result<&mut MapBuilder> {
        self.push_child().map()
    }

    /// Appends `value` through its [`ToBencode`] implementation.
    ///
    /// A list has no way to represent an absent element, so a value that
    /// writes nothing (such as `None`) fails when the list is finished.
    pub fn push<T: ToBencode + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push_child().encode(value)
    }

    /// Appends every item of `values`
    pub fn extend<'v, T, I>(&mut self, values: I) -> Result<()>
    where
        T: ToBencode + ?Sized + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        values.into_iter().try_for_each(|value| self.push(value))
    }

    fn push_child(&mut self) -> &mut Encoder {
        let index = self.items.len();
        let context = self.context.child(PathSegment::Index(index));
        self.items.push(Encoder::from_context(context));
        &mut self.items[index]
    }

    pub(crate) fn finalize(self, out: &mut Vec<u8>) -> Result<()> {
        out.push(b'l');
        for item in self.items {
            item.finish_into(out)?;
        }
        out.push(b'e');
        Ok(())
    }
}
