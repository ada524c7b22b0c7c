//! Binary buffers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a mutable byte buffer (`ArrayBuffer`).
#[derive(Clone, Default)]
pub struct BufferRef(Rc<RefCell<Vec<u8>>>);

impl BufferRef {
    /// Zero-filled buffer of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self::from_bytes(vec![0; len])
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Rc::new(RefCell::new(bytes)))
    }

    pub fn byte_length(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    /// Write one byte. Returns false when `index` is out of bounds.
    pub fn set_byte(&self, index: usize, byte: u8) -> bool {
        match self.0.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = byte;
                true
            }
            None => false,
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&*self.0.borrow())
    }

    pub fn ptr_eq(&self, other: &BufferRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for BufferRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayBuffer({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_byte_bounds() {
        let buf = BufferRef::new(2);
        assert!(buf.set_byte(1, 0xff));
        assert!(!buf.set_byte(2, 0x01));
        assert_eq!(buf.to_hex(), "00ff");
    }
}
