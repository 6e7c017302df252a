//! Documenta Application
//!
//! Command-line shell over the core: configuration, clipboard and capture
//! collaborators, and the command dispatcher.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod imaging;
pub mod shortcuts;

pub use commands::{AppError, Cli, Command, Session, run};
pub use config::AppConfig;
pub use shortcuts::{KeyCombo, ShortcutAction, ShortcutMap};
