// ABOUTME: Version info, welcome messages, and REPL history location

use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "AuroraLang interactive interpreter";
pub const WELCOME_FOOTER: &str =
    "Type .help for commands; end multi-line input with a line of ;;";

pub const PROMPT: &str = "aurora> ";
pub const CONTINUE_PROMPT: &str = "   ...> ";

const HISTORY_FILE: &str = ".aurora_history";

/// REPL history lives in the user's home directory; when no home directory
/// is known it falls back to the working directory.
pub fn history_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(HISTORY_FILE),
        None => PathBuf::from(HISTORY_FILE),
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  .exit          Exit the REPL (history is saved)
  .help          Show this help message
  .load <path>   Evaluate a source file in the current interpreter
  ;;             Evaluate the accumulated multi-line buffer";
