//! Command tree and dispatch
//!
//! The tree is built once at startup and never changes afterwards. Argument
//! parsing is delegated to clap: [`CommandNode::to_clap`] mirrors the tree as
//! a `clap::Command`, and [`CommandNode::execute`] walks the parsed matches
//! back down to the node whose handler should run.

use std::ffi::OsString;
use std::io::Write as _;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches};
use tracing::debug;

use crate::context::ExecutionContext;
use crate::error::LinkctlError;
use crate::factory::Factory;
use crate::iostreams::IoStreams;

/// Flag id for the root-level `--version` flag
const VERSION_FLAG: &str = "version";
/// Arg id collecting positional arguments passed to a leaf
pub const LEAF_ARGS: &str = "args";
/// Flag id for the global `--verbose` flag
pub const VERBOSE_FLAG: &str = "verbose";

/// Handler invoked when a leaf command is selected
pub type Handler = Box<dyn Fn(&mut Invocation<'_>) -> anyhow::Result<()> + Send + Sync>;

/// Descriptive metadata carried by every command node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandMeta {
    /// Name used to invoke the command
    pub name: String,
    /// One-line description shown in command listings
    pub short: String,
    /// Full description shown in the command's own help
    pub long: String,
    /// Hidden commands run normally but are left out of help output
    pub hidden: bool,
}

impl CommandMeta {
    #[must_use]
    #[inline]
    pub fn new(name: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: short.into(),
            ..Self::default()
        }
    }

    #[must_use]
    #[inline]
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    #[must_use]
    #[inline]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// A node in the command tree
pub enum CommandNode {
    /// Runnable command without children
    Leaf { meta: CommandMeta, handler: Handler },
    /// Command grouping child commands
    Branch {
        meta: CommandMeta,
        /// Precomputed version banner, set on the root
        version_info: Option<String>,
        children: Vec<CommandNode>,
    },
}

/// Everything a handler sees while it runs
pub struct Invocation<'a> {
    /// Resolved command path, root first
    pub path: Vec<String>,
    /// Root of the tree the command was resolved from
    pub root: &'a CommandNode,
    /// Parsed arguments of the selected command
    pub matches: &'a ArgMatches,
    pub io: &'a mut IoStreams,
    pub ctx: &'a ExecutionContext,
}

impl CommandNode {
    /// Leaf node running `handler`
    #[must_use]
    #[inline]
    pub fn leaf<F>(meta: CommandMeta, handler: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Leaf {
            meta,
            handler: Box::new(handler),
        }
    }

    /// Branch node without children
    #[must_use]
    #[inline]
    pub const fn branch(meta: CommandMeta) -> Self {
        Self::Branch {
            meta,
            version_info: None,
            children: Vec::new(),
        }
    }

    /// Attach the version banner to a branch; leaves are returned unchanged
    #[must_use]
    #[inline]
    pub fn with_version_info(mut self, info: impl Into<String>) -> Self {
        if let Self::Branch { version_info, .. } = &mut self {
            *version_info = Some(info.into());
        }
        self
    }

    /// Register a child command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `self` is a leaf
    /// - a child with the same name is already registered
    #[inline]
    pub fn add_command(&mut self, child: Self) -> Result<(), LinkctlError> {
        match self {
            Self::Leaf { meta, .. } => Err(LinkctlError::construction(format!(
                "cannot add command {:?} to leaf command {:?}",
                child.meta().name,
                meta.name
            ))),
            Self::Branch { meta, children, .. } => {
                if children.iter().any(|c| c.meta().name == child.meta().name) {
                    return Err(LinkctlError::construction(format!(
                        "command {:?} is already registered under {:?}",
                        child.meta().name,
                        meta.name
                    )));
                }
                children.push(child);
                Ok(())
            }
        }
    }

    #[must_use]
    #[inline]
    pub const fn meta(&self) -> &CommandMeta {
        match self {
            Self::Leaf { meta, .. } | Self::Branch { meta, .. } => meta,
        }
    }

    /// Version banner stored on this node, if any
    #[must_use]
    #[inline]
    pub fn version_info(&self) -> Option<&str> {
        match self {
            Self::Leaf { .. } => None,
            Self::Branch { version_info, .. } => version_info.as_deref(),
        }
    }

    /// Child commands in registration order
    #[must_use]
    #[inline]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Branch { children, .. } => children,
        }
    }

    /// Find the node at `path`, relative to this node's children
    #[must_use]
    #[inline]
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&Self> {
        path.iter().try_fold(self, |node, name| {
            node.children()
                .iter()
                .find(|child| child.meta().name == name.as_ref())
        })
    }

    /// Build the clap representation of this tree
    #[must_use]
    #[inline]
    pub fn to_clap(&self) -> clap::Command {
        self.build_clap().arg(
            Arg::new(VERBOSE_FLAG)
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable verbose logging output"),
        )
    }

    fn build_clap(&self) -> clap::Command {
        let meta = self.meta();
        let mut cmd = clap::Command::new(meta.name.clone())
            .about(meta.short.clone())
            .hide(meta.hidden);
        if !meta.long.is_empty() {
            cmd = cmd.long_about(meta.long.clone());
        }

        if let Self::Branch {
            version_info,
            children,
            ..
        } = self
        {
            if version_info.is_some() {
                cmd = cmd.arg(
                    Arg::new(VERSION_FLAG)
                        .long("version")
                        .action(ArgAction::SetTrue)
                        .help(format!("Show {} version", meta.name)),
                );
            }
            cmd = cmd.subcommands(children.iter().map(Self::build_clap));
        } else {
            // Leaves accept and ignore extra positional arguments
            cmd = cmd.arg(
                Arg::new(LEAF_ARGS)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .hide(true),
            );
        }

        cmd
    }

    /// Parse `args` and run the selected command
    ///
    /// Help requests and branches invoked without a subcommand print help to
    /// the output stream and succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The arguments do not resolve to a command
    /// - The selected handler fails
    /// - Writing to the output stream fails
    pub fn execute<I, T>(
        &self,
        ctx: &ExecutionContext,
        factory: &mut Factory,
        args: I,
    ) -> Result<(), LinkctlError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cli = self.to_clap();
        let root_path = vec![self.meta().name.clone()];
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        let matches = match cli.try_get_matches_from_mut(args.iter().cloned()) {
            Ok(matches) => matches,
            Err(err) => {
                return self.handle_parse_error(&err, factory, self.resolve_path(&args));
            }
        };

        let mut node = self;
        let mut current = &matches;
        let mut path = root_path;

        loop {
            match node {
                Self::Leaf { handler, .. } => {
                    debug!(command = %path.join(" "), "running command");
                    let mut invocation = Invocation {
                        path: path.clone(),
                        root: self,
                        matches: current,
                        io: &mut factory.io_streams,
                        ctx,
                    };
                    let outcome = handler(&mut invocation)
                        .and_then(|()| factory.io_streams.out.flush().map_err(Into::into));
                    return outcome.map_err(|cause| LinkctlError::execution(path, cause));
                }
                Self::Branch {
                    version_info,
                    children,
                    ..
                } => {
                    let Some((name, sub_matches)) = current.subcommand() else {
                        let text = match version_info.as_deref() {
                            Some(info) if flag_set(current, VERSION_FLAG) => info.to_owned(),
                            _ => render_help(&mut cli, &path),
                        };
                        return write_out(factory, &text)
                            .map_err(|cause| LinkctlError::execution(path, cause));
                    };

                    let Some(child) = children.iter().find(|c| c.meta().name == name) else {
                        return Err(LinkctlError::execution(
                            path,
                            anyhow::anyhow!("unknown command {name:?}"),
                        ));
                    };
                    path.push(name.to_owned());
                    node = child;
                    current = sub_matches;
                }
            }
        }
    }

    /// Deepest command path named by `args`, ignoring flags
    fn resolve_path(&self, args: &[OsString]) -> Vec<String> {
        let mut node = self;
        let mut path = vec![self.meta().name.clone()];
        for token in args.iter().skip(1) {
            let Some(token) = token.to_str() else { break };
            if token.starts_with('-') {
                continue;
            }
            match node.find(&[token]) {
                Some(child) => {
                    path.push(child.meta().name.clone());
                    node = child;
                }
                None => break,
            }
        }
        path
    }

    fn handle_parse_error(
        &self,
        err: &clap::Error,
        factory: &mut Factory,
        path: Vec<String>,
    ) -> Result<(), LinkctlError> {
        match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion => write_out(factory, &err.to_string())
                .map_err(|cause| LinkctlError::execution(path, cause)),
            _ => {
                debug!(command = %self.meta().name, kind = ?err.kind(), "argument parsing failed");
                Err(LinkctlError::usage(path, err))
            }
        }
    }
}

impl core::fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Leaf { meta, .. } => f.debug_struct("Leaf").field("meta", meta).finish_non_exhaustive(),
            Self::Branch {
                meta,
                version_info,
                children,
            } => f
                .debug_struct("Branch")
                .field("meta", meta)
                .field("version_info", version_info)
                .field("children", children)
                .finish(),
        }
    }
}

fn flag_set(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

/// Render help for the command at `path` in an already built clap tree
fn render_help(cli: &mut clap::Command, path: &[String]) -> String {
    cli.build();
    let mut cmd = cli.clone();
    for name in path.iter().skip(1) {
        match cmd.find_subcommand(name).cloned() {
            Some(sub) => cmd = sub,
            None => break,
        }
    }
    cmd.render_help().to_string()
}

fn write_out(factory: &mut Factory, text: &str) -> anyhow::Result<()> {
    let out = &mut factory.io_streams.out;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn echo_tree() -> CommandNode {
        let mut root = CommandNode::branch(CommandMeta::new("app", "Test app"))
            .with_version_info("app version 1.0.0\n");
        root.add_command(CommandNode::leaf(
            CommandMeta::new("echo", "Echo the command path"),
            |inv| {
                writeln!(inv.io.out, "{}", inv.path.join("/"))?;
                Ok(())
            },
        ))
        .unwrap();
        root.add_command(CommandNode::leaf(
            CommandMeta::new("fail", "Always fails").hidden(),
            |_| Err(anyhow::anyhow!("handler exploded")),
        ))
        .unwrap();
        root
    }

    fn run(args: &[&str]) -> (Result<(), LinkctlError>, String) {
        let (ios, buffers) = IoStreams::test();
        let mut factory = Factory::with_io_streams("1.0.0", ios);
        let ctx = ExecutionContext::background();
        let result = echo_tree().execute(&ctx, &mut factory, args.iter().copied());
        (result, buffers.out.contents())
    }

    #[test]
    fn test_dispatches_to_leaf() {
        let (result, out) = run(&["app", "echo"]);
        result.unwrap();
        assert_eq!(out, "app/echo\n");
    }

    #[test]
    fn test_handler_error_carries_path() {
        let (result, _) = run(&["app", "fail"]);
        let err = result.unwrap_err();
        assert_eq!(err.path(), ["app", "fail"]);
        assert_eq!(err.to_string(), "handler exploded");
    }

    #[test]
    fn test_unknown_subcommand_is_usage_error() {
        let (result, out) = run(&["app", "nope"]);
        let err = result.unwrap_err();
        assert!(matches!(err, LinkctlError::Usage { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_bare_branch_prints_help_without_hidden_commands() {
        let (result, out) = run(&["app"]);
        result.unwrap();
        assert!(out.contains("Test app"));
        assert!(out.contains("echo"));
        assert!(!out.contains("fail"));
    }

    #[test]
    fn test_version_flag_prints_stored_banner() {
        let (result, out) = run(&["app", "--version"]);
        result.unwrap();
        assert_eq!(out, "app version 1.0.0\n");
    }

    #[test]
    fn test_verbose_is_accepted_everywhere() {
        let (result, out) = run(&["app", "echo", "--verbose"]);
        result.unwrap();
        assert_eq!(out, "app/echo\n");
    }

    #[test]
    fn test_usage_error_names_subcommand() {
        let (result, _) = run(&["app", "echo", "--json"]);
        let err = result.unwrap_err();
        assert!(matches!(err, LinkctlError::Usage { .. }));
        assert_eq!(err.path(), ["app", "echo"]);
    }

    #[test]
    fn test_usage_error_path_skips_flags() {
        let (result, _) = run(&["app", "--verbose", "echo", "--bogus"]);
        assert_eq!(result.unwrap_err().path(), ["app", "echo"]);

        let (result, _) = run(&["app", "nope"]);
        assert_eq!(result.unwrap_err().path(), ["app"]);
    }

    #[test]
    fn test_leaf_accepts_extra_positionals() {
        let (result, out) = run(&["app", "echo", "extra", "more"]);
        result.unwrap();
        assert_eq!(out, "app/echo\n");
    }

    #[test]
    fn test_duplicate_child_is_rejected() {
        let mut root = echo_tree();
        let err = root
            .add_command(CommandNode::branch(CommandMeta::new("echo", "again")))
            .unwrap_err();
        assert!(err.is_construction());
    }

    #[test]
    fn test_find_walks_children() {
        let root = echo_tree();
        assert_eq!(root.find(&["fail"]).map(|n| n.meta().hidden), Some(true));
        assert!(root.find(&["missing"]).is_none());
        assert_eq!(root.find::<&str>(&[]).map(|n| n.meta().name.as_str()), Some("app"));
    }
}
