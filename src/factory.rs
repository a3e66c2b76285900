//! Shared dependencies handed to every command constructor

use crate::iostreams::IoStreams;

/// Name of the installed executable
pub const EXECUTABLE_NAME: &str = "linkctl";

/// Configuration and I/O shared across the command tree
#[derive(Debug)]
pub struct Factory {
    /// Application version, empty for local builds
    pub app_version: String,
    /// Executable name shown in help and banners
    pub executable_name: String,
    pub io_streams: IoStreams,
}

impl Factory {
    /// Factory bound to the process's standard streams
    #[must_use]
    #[inline]
    pub fn new(app_version: impl Into<String>) -> Self {
        Self::with_io_streams(app_version, IoStreams::system())
    }

    /// Factory writing through the given streams
    #[must_use]
    #[inline]
    pub fn with_io_streams(app_version: impl Into<String>, io_streams: IoStreams) -> Self {
        Self {
            app_version: app_version.into(),
            executable_name: EXECUTABLE_NAME.to_owned(),
            io_streams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_fields() {
        let (ios, _buffers) = IoStreams::test();
        let factory = Factory::with_io_streams("1.0.0", ios);

        assert_eq!(factory.app_version, "1.0.0");
        assert_eq!(factory.executable_name, "linkctl");
    }
}
