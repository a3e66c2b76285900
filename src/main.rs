//! # `linkctl`
//!
//! Command-line debugger for mobile universal links, deeplinks, and app links.
//!
//! ```sh
//! linkctl --help
//! linkctl version
//! ```

use linkctl::build_info;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> std::process::ExitCode {
    let verbose = std::env::args_os().any(|arg| arg == "--verbose");

    // Diagnostics go to stderr; stay quiet unless asked
    let log_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    linkctl::run(build_info::version()).into()
}
