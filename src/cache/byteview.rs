//! Byte View Module
//!
//! Immutable byte buffer handed out to callers of a group.

use std::fmt;

use bytes::Bytes;

use crate::cache::Value;

// == Byte View ==
/// Read-only view over a cached value.
///
/// The underlying buffer is never exposed mutably; `byte_slice` hands out
/// an owned copy so callers cannot alias cache memory.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    // == Constructor ==
    /// Copies `data` into a new view.
    pub fn copy_from(data: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(data),
        }
    }

    // == Byte Slice ==
    /// Returns an owned copy of the bytes.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Borrows the bytes without copying.
    pub fn as_bytes(&self) -> &[u8] {
        &self.b
    }

    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }
}

impl From<Vec<u8>> for ByteView {
    /// Takes ownership of `data` without copying.
    fn from(data: Vec<u8>) -> Self {
        Self { b: Bytes::from(data) }
    }
}

impl Value for ByteView {
    fn len(&self) -> usize {
        self.b.len()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.b))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.b.len())
            .field("value", &String::from_utf8_lossy(&self.b))
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_slice_is_a_copy() {
        let view = ByteView::copy_from(b"630");
        let mut copy = view.byte_slice();
        copy[0] = b'9';

        assert_eq!(view.as_bytes(), b"630");
        assert_eq!(copy, b"930");
    }

    #[test]
    fn test_copy_from_detaches_source() {
        let mut source = b"abc".to_vec();
        let view = ByteView::copy_from(&source);
        source[0] = b'z';

        assert_eq!(view.to_string(), "abc");
    }

    #[test]
    fn test_len_and_display() {
        let view = ByteView::from(b"hello".to_vec());
        assert_eq!(view.len(), 5);
        assert!(!view.is_empty());
        assert_eq!(view.to_string(), "hello");
        assert!(ByteView::default().is_empty());
    }
}
