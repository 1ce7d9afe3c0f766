//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the picsync binary.

mod commands;
mod gallery;
mod server;
mod settings;

pub use commands::{Cli, Commands, SettingsCommands};
pub use gallery::{delete, list_photos, list_remote, sync, upload};
pub use server::{check_health, login, logout, set_server};
pub use settings::handle_settings_command;
