//! Command-line interface.

pub mod commands;
pub mod table;
pub mod types;

pub use types::{Cli, Commands, ProfileCommands};

/// Print a failed command's error and exit non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        println!("{body}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
