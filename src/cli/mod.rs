//! Command-line interface module
//!
//! Builds the command tree, runs it, and maps the outcome to an exit code

pub mod completion;
pub mod root;
pub mod tree;
pub mod version;

use std::ffi::OsString;
use std::io::Write as _;

use tracing::debug;

pub use tree::{CommandMeta, CommandNode, Invocation, LEAF_ARGS, VERBOSE_FLAG};

use crate::context::ExecutionContext;
use crate::error::LinkctlError;
use crate::factory::Factory;

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Ok = 0,
    Error = 1,
}

impl From<ExitCode> for std::process::ExitCode {
    #[inline]
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Run linkctl against the process's arguments and standard streams
#[must_use]
#[inline]
pub fn run(app_version: String) -> ExitCode {
    let mut factory = Factory::new(app_version);
    main_with(&mut factory, std::env::args_os(), root::new_cmd_root)
}

/// Build the tree with `build_root`, execute it against `args`, and report
/// any failure on the factory's error stream
pub fn main_with<I, T, B>(factory: &mut Factory, args: I, build_root: B) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: FnOnce(&Factory, &str) -> Result<CommandNode, LinkctlError>,
{
    let ctx = ExecutionContext::background();
    let app_version = factory.app_version.clone();

    let root_cmd = match build_root(&*factory, &app_version) {
        Ok(root_cmd) => root_cmd,
        Err(err) => {
            report(factory, &format!("failed to create root command: {err}"));
            return ExitCode::Error;
        }
    };

    if let Err(err) = root_cmd.execute(&ctx, factory, args) {
        debug!(command = %err.path().join(" "), exit_code = err.exit_code(), "command failed");
        report(factory, &format!("error: {err}"));
        return ExitCode::Error;
    }

    ExitCode::Ok
}

fn report(factory: &mut Factory, line: &str) {
    let err_out = &mut factory.io_streams.err_out;
    if writeln!(err_out, "{line}").and_then(|()| err_out.flush()).is_err() {
        debug!("failed to write diagnostic to error stream");
    }
}
