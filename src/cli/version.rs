//! `version` command and version banner formatting

use std::io::Write as _;
use std::sync::LazyLock;

use anyhow::Context as _;
use regex::Regex;

use super::tree::{CommandMeta, CommandNode};
use crate::factory::EXECUTABLE_NAME;

/// Repository that hosts releases
pub const REPO_URL: &str = "https://github.com/space-code/linkctl";

/// Strict `MAJOR.MINOR.PATCH[-PRERELEASE]` shape
const RELEASE_PATTERN: &str = r"^[0-9]+\.[0-9]+\.[0-9]+(-[0-9A-Za-z_.]+)?$";

static RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RELEASE_PATTERN).expect("release pattern compiles"));

/// Build the hidden `version` command
///
/// The handler re-emits the banner stored on the root of the tree it runs in.
#[must_use]
pub fn new_cmd_version() -> CommandNode {
    CommandNode::leaf(
        CommandMeta::new("version", format!("Show {EXECUTABLE_NAME} version information")).hidden(),
        |inv| {
            let info = inv
                .root
                .version_info()
                .context("root command carries no version information")?;
            inv.io.out.write_all(info.as_bytes())?;
            Ok(())
        },
    )
}

/// Format the two-line version banner
///
/// A leading `v` is stripped for display. Release-shaped versions link to
/// their `v`-prefixed tag, everything else to the latest release.
#[must_use]
#[inline]
pub fn format(version: &str) -> String {
    let version = version.strip_prefix('v').unwrap_or(version);
    format!(
        "{EXECUTABLE_NAME} version {version}\n{}\n",
        changelog_url(version)
    )
}

/// Release page for an already stripped version
#[must_use]
pub fn changelog_url(version: &str) -> String {
    if is_release(version) {
        format!("{REPO_URL}/releases/tag/v{version}")
    } else {
        format!("{REPO_URL}/releases/latest")
    }
}

fn is_release(version: &str) -> bool {
    RELEASE_RE.is_match(version)
}
