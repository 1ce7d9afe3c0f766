//! picsync CLI binary.
//!
//! This binary provides command-line access to picsync:
//! - Point at a media server and log in
//! - List local photos with their upload status
//! - Upload, delete and sync photos

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands};

    // Load .env before anything reads PICSYNC_* variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    picsync::init_telemetry(cli.verbose, cli.json_logs)?;

    let config = match &cli.config {
        Some(path) => picsync::PicsyncConfig::from_file(path)?,
        None => picsync::PicsyncConfig::load()?,
    };
    let config = match &cli.photo_dir {
        Some(dir) => config.with_photo_dir(dir.clone()),
        None => config,
    };
    let context = picsync::AppContext::load(config)?;

    match cli.command {
        Commands::Health => cli::check_health(&context).await?,
        Commands::Server { url, host, port, force } => {
            cli::set_server(&context, url, host, port, force).await?
        }
        Commands::Login { username, password } => {
            cli::login(&context, &username, password).await?
        }
        Commands::Logout => cli::logout(&context).await?,
        Commands::Settings(command) => cli::handle_settings_command(&context, command)?,
        Commands::List { pages } => cli::list_photos(&context, pages).await?,
        Commands::Remote => cli::list_remote(&context).await?,
        Commands::Upload { all, ids } => cli::upload(&context, all, ids).await?,
        Commands::Delete { ids } => cli::delete(&context, ids).await?,
        Commands::Sync => cli::sync(&context).await?,
    }

    Ok(())
}
