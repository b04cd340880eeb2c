//! Command-line interface module.

mod args;
pub mod common;
pub mod scan;
pub mod watch;

pub use args::{Cli, Commands, ScanArgs};
