//! Command-line interface and orchestration for repo-pulse
//!
//! This module parses the command line, loads configuration, sets up logging, runs the
//! [`Analyzer`](crate::activity::Analyzer) against the real hosting API, and prints the
//! finished reports.
//!
//! # Execution Flow
//!
//! 1. Parse arguments with clap; help, version, and malformed input never reach the network
//! 2. Load configuration (`--config`, else `pulse.toml`, else built-in defaults)
//! 3. Build the HTTP client and run the three reports
//! 4. Render the console tables and, when requested, the JSON document
//!
//! Exit codes are reported through the [`Host`]: 0 on success, 2 for usage or configuration
//! errors, and -1 when the run or any individual report failed.

mod analyze;
mod config;
mod host;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use analyze::{AnalyzeArgs, ColorMode, EXIT_FAILURE, EXIT_USAGE, LogLevel, process_analyze};
pub use host::Host;
pub use run::run;
