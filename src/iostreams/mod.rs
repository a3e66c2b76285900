//! I/O stream abstraction
//!
//! Every piece of output-producing code writes through an [`IoStreams`]
//! bundle instead of the process's standard streams, so tests can swap in
//! in-memory buffers.
//!
//! # Implementations
//! - [`IoStreams::system`]: bound to the real stdin, stdout and stderr
//! - [`IoStreams::test`]: backed by shared [`TestBuffer`]s

use std::io::{self, Read, Write};

pub mod buffer;

pub use buffer::TestBuffer;

/// Input, output and error-output handles for one process
pub struct IoStreams {
    /// Readable input stream
    pub input: Box<dyn Read + Send>,
    /// Primary output stream
    pub out: Box<dyn Write + Send>,
    /// Diagnostic output stream
    pub err_out: Box<dyn Write + Send>,
}

/// In-memory handles returned alongside a test bundle
#[derive(Debug, Clone, Default)]
pub struct TestStreams {
    pub input: TestBuffer,
    pub out: TestBuffer,
    pub err_out: TestBuffer,
}

impl IoStreams {
    /// Bundle bound to the process's standard streams
    #[must_use]
    #[inline]
    pub fn system() -> Self {
        Self {
            input: Box::new(io::stdin()),
            out: Box::new(io::stdout()),
            err_out: Box::new(io::stderr()),
        }
    }

    /// Bundle backed by in-memory buffers
    ///
    /// The returned [`TestStreams`] share storage with the bundle, so whatever
    /// is written through the bundle can be inspected afterwards.
    ///
    /// # Example
    /// ```
    /// use linkctl::iostreams::IoStreams;
    /// use std::io::Write as _;
    ///
    /// let (mut ios, buffers) = IoStreams::test();
    /// write!(ios.out, "hello").unwrap();
    /// assert_eq!(buffers.out.contents(), "hello");
    /// ```
    #[must_use]
    #[inline]
    pub fn test() -> (Self, TestStreams) {
        let buffers = TestStreams::default();
        let ios = Self {
            input: Box::new(buffers.input.clone()),
            out: Box::new(buffers.out.clone()),
            err_out: Box::new(buffers.err_out.clone()),
        };
        (ios, buffers)
    }
}

impl core::fmt::Debug for IoStreams {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IoStreams").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streams_are_captured_separately() {
        let (mut ios, buffers) = IoStreams::test();
        write!(ios.out, "to out").unwrap();
        write!(ios.err_out, "to err").unwrap();

        assert_eq!(buffers.out.contents(), "to out");
        assert_eq!(buffers.err_out.contents(), "to err");
        assert!(buffers.input.contents().is_empty());
    }

    #[test]
    fn test_input_reads_seeded_bytes() {
        let (mut ios, buffers) = IoStreams::test();
        buffers.input.seed(b"https://example.com/path");

        let mut read = String::new();
        ios.input.read_to_string(&mut read).unwrap();
        assert_eq!(read, "https://example.com/path");
    }
}
