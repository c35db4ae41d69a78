//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, logging setup,
//! and the interactive session runner.

pub mod app;
pub mod args;
pub mod command;
pub mod config_cmd;
pub mod demo;
pub mod export;
pub mod logging;
pub mod presenter;

// Re-export commonly used types
pub use app::{
    load_merged_config, run_check, run_interactive, run_session, SessionOptions, SetupError,
    EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
pub use args::{Cli, Commands, ConfigAction};
pub use command::{Command, CommandError};
pub use logging::init_logging;
pub use presenter::Presenter;
