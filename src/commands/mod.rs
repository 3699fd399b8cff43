//! Command implementations
//!
//! Each command is a module with an `execute` function that takes parsed CLI
//! args, drives the [`ModeCoordinator`](crate::controllers::ModeCoordinator)
//! and prints the resulting state.

pub mod config;
pub mod gallery;
pub mod show;
pub mod upload;

// Re-export execute functions for convenience
pub use config::execute as config;
pub use gallery::execute as gallery;
pub use show::execute as show;
pub use upload::execute as upload;

use crate::VqaError;

type Result<T> = std::result::Result<T, VqaError>;

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Only print results, no headers or hints
    pub quiet: bool,
    /// Print state snapshots as JSON
    pub json: bool,
}

/// Print `value` as pretty JSON
fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
