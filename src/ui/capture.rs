//! ui::capture
//!
//! An in-memory output sink that stays readable after being handed to a
//! [`Toplevel`](crate::engine::Toplevel).
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use toplevel::ui::OutputBuffer;
//!
//! let buffer = OutputBuffer::new();
//! let mut sink = buffer.clone();
//! writeln!(sink, "hello").unwrap();
//! assert_eq!(buffer.contents(), "hello\n");
//! ```

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Shared, growable byte buffer implementing [`Write`].
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.bytes.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.borrow().is_empty()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let buffer = OutputBuffer::new();
        let mut writer = buffer.clone();
        write!(writer, "a").unwrap();
        write!(writer, "b").unwrap();
        assert_eq!(buffer.contents(), "ab");
        buffer.clear();
        assert!(writer.is_empty());
    }
}
