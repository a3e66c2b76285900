//! `linkctl` - debug universal links, deeplinks, and app links
//!
//! This library holds the command tree behind the `linkctl` binary together
//! with the plumbing it runs on: build-version detection, the I/O stream
//! bundle, and the factory shared by command constructors.

pub mod build_info;
pub mod cli;
pub mod context;
pub mod error;
pub mod factory;
pub mod iostreams;

pub use cli::{ExitCode, main_with, run};
pub use error::LinkctlError;
pub use factory::Factory;
