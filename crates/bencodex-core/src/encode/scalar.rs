//! Scalar builder: one integer or byte string.

use super::{write_byte_string, Context, Encoder};
use crate::convert::ToBencode;
use crate::error::{ErrorKind, Result};
use crate::path::KeyPath;

/// Accepts exactly one write; a second one fails with
/// [`ErrorKind::AlreadyEncoded`]
#[derive(Debug)]
pub struct ScalarBuilder {
    context: Context,
    buffer: Option<Vec<u8>>,
}

impl ScalarBuilder {
    pub(crate) fn new(context: Context) -> Self {
        Self {
            context,
            buffer: None,
        }
    }

    /// Path from the document root
    pub fn path(&self) -> &KeyPath {
        &self.context.path
    }

    /// Returns true once a value has been written
    pub fn is_written(&self) -> bool {
        self.buffer.is_some()
    }

    /// Writes `i<digits>e` with the minimal decimal form of `value`
    pub fn write_integer(&mut self, value: impl Into<i128>) -> Result<()> {
        let value: i128 = value.into();
        let buffer = self.claim()?;
        buffer.push(b'i');
        buffer.extend_from_slice(value.to_string().as_bytes());
        buffer.push(b'e');
        Ok(())
    }

    /// Writes `<len>:<bytes>`
    pub fn write_bytes(&mut self, bytes: impl AsRef<[u8]>) -> Result<()> {
        let bytes = bytes.as_ref();
        let buffer = self.claim()?;
        write_byte_string(buffer, bytes);
        Ok(())
    }

    /// Writes UTF-8 text as a byte string
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Encodes `value` with a child encoder and splices its finished bytes
    /// into this slot verbatim.
    ///
    /// The child sits at the same depth and path as this scalar, so the
    /// output is exactly what encoding `value` in place would produce.
    pub fn write_nested<T: ToBencode + ?Sized>(&mut self, value: &T) -> Result<()> {
        if self.is_written() {
            return Err(self.context.error(ErrorKind::AlreadyEncoded));
        }

        let mut child = Encoder::from_context(self.context.clone());
        child.encode(value)?;
        let document = child.finish()?;

        let buffer = self.claim()?;
        buffer.extend_from_slice(&document);
        Ok(())
    }

    fn claim(&mut self) -> Result<&mut Vec<u8>> {
        if self.buffer.is_some() {
            return Err(self.context.error(ErrorKind::AlreadyEncoded));
        }
        Ok(self.buffer.insert(Vec::new()))
    }

    pub(crate) fn finalize(self, out: &mut Vec<u8>) -> Result<()> {
        let buffer = self
            .buffer
            .ok_or_else(|| self.context.error(ErrorKind::UnsupportedType("unwritten scalar")))?;
        out.extend_from_slice(&buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn finish(build: impl FnOnce(&mut ScalarBuilder) -> Result<()>) -> Result<Vec<u8>> {
        let mut encoder = Encoder::new();
        build(encoder.scalar())?;
        encoder.finish()
    }

    #[test]
    fn test_canonical_integers() {
        assert_eq!(finish(|s| s.write_integer(0)).unwrap(), b"i0e");
        assert_eq!(finish(|s| s.write_integer(-1)).unwrap(), b"i-1e");
        assert_eq!(finish(|s| s.write_integer(1_000u32)).unwrap(), b"i1000e");
        assert_eq!(
            finish(|s| s.write_integer(i64::MIN)).unwrap(),
            b"i-9223372036854775808e"
        );
        assert_eq!(
            finish(|s| s.write_integer(u64::MAX)).unwrap(),
            b"i18446744073709551615e"
        );
    }

    #[test]
    fn test_bytes() {
        assert_eq!(finish(|s| s.write_bytes(b"")).unwrap(), b"0:");
        assert_eq!(finish(|s| s.write_str("two")).unwrap(), b"3:two");
        assert_eq!(
            finish(|s| s.write_bytes([0xffu8, 0x00])).unwrap(),
            b"2:\xff\x00"
        );
    }

    #[test]
    fn test_second_write_fails() {
        let err = finish(|s| {
            s.write_integer(1)?;
            s.write_str("again")
        })
        .unwrap_err();
        assert_eq!(err.kind(), Some(&ErrorKind::AlreadyEncoded));

        let err = finish(|s| {
            s.write_str("first")?;
            s.write_nested(&1i64)
        })
        .unwrap_err();
        assert_eq!(err.kind(), Some(&ErrorKind::AlreadyEncoded));
    }

    #[test]
    fn test_unwritten_scalar() {
        let err = finish(|_| Ok(())).unwrap_err();
        assert_eq!(
            err.kind(),
            Some(&ErrorKind::UnsupportedType("unwritten scalar"))
        );
    }

    #[test]
    fn test_nested_document() {
        let bytes = finish(|s| s.write_nested(&vec![1i64, 2])).unwrap();
        assert_eq!(bytes, b"li1ei2ee");

        assert_eq!(finish(|s| s.write_nested(&5u8)).unwrap(), b"i5e");
        assert_eq!(finish(|s| s.write_nested("spam")).unwrap(), b"4:spam");
    }

    #[test]
    fn test_nested_document_keeps_depth() {
        let mut encoder = Encoder::with_max_depth(1);
        encoder.scalar().write_nested(&vec![1i64]).unwrap();
        assert_eq!(encoder.finish().unwrap(), b"li1ee");

        let mut encoder = Encoder::with_max_depth(1);
        let err = encoder
            .scalar()
            .write_nested(&vec![vec![1i64]])
            .unwrap_err();
        assert_eq!(err.kind(), Some(&ErrorKind::NestingTooDeep(1)));
        assert_eq!(err.key_path().unwrap().to_string(), "$[0]");
    }

    #[test]
    fn test_nested_failure_leaves_slot_unwritten() {
        let mut encoder = Encoder::new();
        let scalar = encoder.scalar();
        let err = scalar.write_nested(&1.5f64).unwrap_err();
        assert_eq!(err.kind(), Some(&ErrorKind::UnsupportedType("f64")));
        assert!(!scalar.is_written());
        scalar.write_nested(&2u8).unwrap();
        assert_eq!(encoder.finish().unwrap(), b"i2e");
    }
}
