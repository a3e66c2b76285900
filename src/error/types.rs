//! Error kinds surfaced by command construction and execution

use thiserror::Error;

/// Main error type for linkctl command handling
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LinkctlError {
    /// The command tree could not be built
    #[error("{message}")]
    Construction { message: String },

    /// A resolved command's handler failed
    #[error("{cause}")]
    Execution {
        /// Command path that was running, root first
        path: Vec<String>,
        cause: anyhow::Error,
    },

    /// Arguments did not resolve to a runnable command
    #[error("{message}")]
    Usage {
        /// Deepest command path resolved before parsing failed
        path: Vec<String>,
        message: String,
    },
}

impl LinkctlError {
    /// Get the process exit code for this error
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Construction { .. } | Self::Execution { .. } | Self::Usage { .. } => 1,
        }
    }

    /// Create a construction error
    #[inline]
    pub fn construction<S: Into<String>>(message: S) -> Self {
        Self::Construction {
            message: message.into(),
        }
    }

    /// Create an execution error for the command at `path`
    #[inline]
    pub fn execution(path: Vec<String>, cause: anyhow::Error) -> Self {
        Self::Execution { path, cause }
    }

    /// Create a usage error from an argument parsing failure
    #[inline]
    pub fn usage(path: Vec<String>, err: &clap::Error) -> Self {
        Self::Usage {
            path,
            message: clap_message(err),
        }
    }

    /// Command path the error is attributed to, empty for construction errors
    #[must_use]
    #[inline]
    pub fn path(&self) -> &[String] {
        match self {
            Self::Construction { .. } => &[],
            Self::Execution { path, .. } | Self::Usage { path, .. } => path,
        }
    }

    /// Whether the error happened while building the command tree
    #[must_use]
    #[inline]
    pub const fn is_construction(&self) -> bool {
        matches!(*self, Self::Construction { .. })
    }
}

/// First line of a clap error without its own `error: ` prefix
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or_default().trim();
    first_line
        .strip_prefix("error:")
        .map_or(first_line, str::trim_start)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(LinkctlError::construction("boom").exit_code(), 1);
        assert_eq!(
            LinkctlError::execution(vec!["linkctl".to_owned()], anyhow::anyhow!("boom"))
                .exit_code(),
            1
        );
    }

    #[test]
    fn test_display_is_bare_cause() {
        let err = LinkctlError::execution(
            vec!["linkctl".to_owned(), "version".to_owned()],
            anyhow::anyhow!("broken pipe"),
        );
        assert_eq!(err.to_string(), "broken pipe");
        assert_eq!(err.path(), ["linkctl", "version"]);
        assert!(!err.is_construction());
    }

    #[test]
    fn test_usage_message_drops_clap_prefix() {
        let cmd = clap::Command::new("linkctl").subcommand(clap::Command::new("version"));
        let err = cmd.try_get_matches_from(["linkctl", "bogus"]).unwrap_err();

        let usage = LinkctlError::usage(vec!["linkctl".to_owned()], &err);
        let message = usage.to_string();
        assert!(!message.starts_with("error:"));
        assert!(message.contains("bogus"));
    }
}
