//! Shared in-memory stream for capturing output in tests

use std::io::{self, Read, Write};
use std::sync::{Arc, RwLock};

/// Cloneable in-memory byte stream
///
/// Clones share the same storage: one clone is handed to [`super::IoStreams`]
/// while the test keeps another to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct TestBuffer {
    state: Arc<RwLock<BufferState>>,
}

#[derive(Debug, Default)]
struct BufferState {
    bytes: Vec<u8>,
    read_pos: usize,
}

impl TestBuffer {
    /// Create an empty buffer
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes to be handed out by subsequent reads
    #[inline]
    pub fn seed(&self, bytes: &[u8]) {
        if let Ok(mut state) = self.state.write() {
            state.bytes.extend_from_slice(bytes);
        }
    }

    /// Everything written so far, lossily decoded as UTF-8
    #[must_use]
    #[inline]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Everything written so far
    #[must_use]
    #[inline]
    pub fn bytes(&self) -> Vec<u8> {
        self.state
            .read()
            .map(|state| state.bytes.clone())
            .unwrap_or_default()
    }
}

impl Write for TestBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for TestBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let start = state.read_pos;
        let remaining = state.bytes.get(start..).unwrap_or_default();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        state.read_pos = start + n;
        Ok(n)
    }
}
