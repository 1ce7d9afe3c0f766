//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// picsync - upload your photo library to a self-hosted media server
#[derive(Parser, Debug)]
#[command(name = "picsync")]
#[command(about = "Upload your photo library to a self-hosted media server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (defaults to the layered picsync.toml lookup)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Photo directory, overriding the configuration
    #[arg(long, global = true)]
    pub photo_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the media server is reachable
    Health,

    /// Choose the media server
    Server {
        /// Full base URL, e.g. http://192.168.1.20:8000/api
        #[arg(conflicts_with_all = ["host", "port"])]
        url: Option<String>,

        /// Server address (used with --port)
        #[arg(long, requires = "port")]
        host: Option<String>,

        /// Server port
        #[arg(long, requires = "host")]
        port: Option<u32>,

        /// Save even if the health check fails
        #[arg(long)]
        force: bool,
    },

    /// Log in to the media server
    Login {
        /// Account name
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the session token
    Logout,

    /// Upload settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// List local photos with their upload status
    List {
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,
    },

    /// List files stored on the server
    Remote,

    /// Upload photos
    Upload {
        /// Upload every photo not yet on the server
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        /// Photo ids, as shown by `picsync list`
        ids: Vec<String>,
    },

    /// Delete uploaded photos from the server
    Delete {
        /// Photo ids, as shown by `picsync list`
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Load the whole library and run one auto-upload pass
    Sync,
}

/// Upload settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the effective settings
    Show,

    /// Change settings
    Set {
        /// Parallel uploads (1-10)
        #[arg(long)]
        max_parallel_uploads: Option<u32>,

        /// Upload new photos automatically during `sync`
        #[arg(long)]
        auto_upload: Option<bool>,

        /// Parallel uploads for automatic uploads
        #[arg(long)]
        auto_upload_concurrency: Option<u32>,
    },

    /// Restore the defaults
    Reset,
}
