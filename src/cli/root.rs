//! Root command construction

use tracing::debug;

use super::tree::{CommandMeta, CommandNode};
use super::{completion, version};
use crate::error::LinkctlError;
use crate::factory::Factory;

/// Build the full command tree
///
/// The version banner is formatted once here and stored on the root, so the
/// `version` command and the `--version` flag print the same text.
///
/// # Errors
///
/// Returns an error if:
/// - A subcommand cannot be registered
#[inline]
pub fn new_cmd_root(factory: &Factory, app_version: &str) -> Result<CommandNode, LinkctlError> {
    let name = factory.executable_name.as_str();
    let mut cmd = CommandNode::branch(
        CommandMeta::new(name, "Mobile Deep Link Debugger")
            .long(format!("{name} - debug universal links, deeplinks, and app links.")),
    )
    .with_version_info(version::format(app_version));

    cmd.add_command(version::new_cmd_version())?;
    cmd.add_command(completion::new_cmd_completion(name)?)?;

    debug!(app_version, commands = cmd.children().len(), "root command built");
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iostreams::IoStreams;

    #[test]
    fn test_root_stores_formatted_banner() {
        let (ios, _buffers) = IoStreams::test();
        let factory = Factory::with_io_streams("v2.0.0", ios);
        let root = new_cmd_root(&factory, &factory.app_version).unwrap();

        assert_eq!(root.meta().name, "linkctl");
        assert_eq!(root.version_info(), Some(version::format("v2.0.0").as_str()));
        assert!(root.find(&["version"]).is_some());
        assert!(root.find(&["completion", "zsh"]).is_some());
    }

    #[test]
    fn test_root_construction_is_total() {
        let (ios, _buffers) = IoStreams::test();
        let factory = Factory::with_io_streams("", ios);
        for v in ["", "devel", "v1.0.0", "not a version", "1.0.0-rc.1"] {
            assert!(new_cmd_root(&factory, v).is_ok());
        }
    }
}
