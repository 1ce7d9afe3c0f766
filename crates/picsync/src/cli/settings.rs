//! Settings command handlers.

use super::SettingsCommands;
use picsync::{AppContext, PicsyncResult, UploadSettings};

/// Handle `settings` subcommands
pub fn handle_settings_command(context: &AppContext, command: SettingsCommands) -> PicsyncResult<()> {
    let settings = context.settings();
    match command {
        SettingsCommands::Show => {
            print_settings(&settings.load_upload_settings());
            println!("server_url              = {}", settings.server_url());
            println!("logged_in               = {}", context.auth().is_authenticated());
        }
        SettingsCommands::Set {
            max_parallel_uploads,
            auto_upload,
            auto_upload_concurrency,
        } => {
            let mut updated = settings.load_upload_settings();
            if let Some(count) = max_parallel_uploads {
                updated = updated.with_max_parallel_uploads(count);
            }
            if let Some(enabled) = auto_upload {
                updated = updated.with_auto_upload(enabled);
            }
            if let Some(count) = auto_upload_concurrency {
                updated = updated.with_auto_upload_concurrency(count);
            }
            let saved = settings.save_upload_settings(updated)?;
            println!("Settings saved");
            print_settings(&saved);
        }
        SettingsCommands::Reset => {
            let saved = settings.reset_upload_settings()?;
            println!("Settings reset to defaults");
            print_settings(&saved);
        }
    }
    Ok(())
}

fn print_settings(settings: &UploadSettings) {
    println!("max_parallel_uploads    = {}", settings.max_parallel_uploads());
    println!("auto_upload             = {}", settings.auto_upload());
    println!("auto_upload_concurrency = {}", settings.auto_upload_concurrency());
}
