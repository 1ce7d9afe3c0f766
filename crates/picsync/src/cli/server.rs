//! Server, login and logout command handlers.

use picsync::{server_url_from_parts, validate_server_url, AppContext, ConfigError, PicsyncResult};
use std::io::Write;

/// Handle the `health` command
pub async fn check_health(context: &AppContext) -> PicsyncResult<()> {
    let url = context.client().base_url();
    if context.client().health_check().await {
        println!("✓ {} is reachable", url);
    } else {
        println!("✗ {} is not reachable", url);
    }
    Ok(())
}

/// Handle the `server` command
pub async fn set_server(
    context: &AppContext,
    url: Option<String>,
    host: Option<String>,
    port: Option<u32>,
    force: bool,
) -> PicsyncResult<()> {
    let url = match (url, host, port) {
        (Some(url), _, _) => validate_server_url(&url)?,
        (None, Some(host), Some(port)) => server_url_from_parts(&host, port)?,
        _ => {
            println!("Current server: {}", context.settings().server_url());
            return Ok(());
        }
    };

    let candidate = context.with_server_url(&url)?;
    if !candidate.client().health_check().await {
        if !force {
            return Err(ConfigError::new(format!(
                "{} is not reachable; use --force to save it anyway",
                url
            ))
            .into());
        }
        tracing::warn!(url = %url, "Saving unreachable server");
    }

    let saved = context.settings().set_server_url(&url)?;
    println!("Server set to {}", saved);
    Ok(())
}

/// Handle the `login` command
pub async fn login(context: &AppContext, username: &str, password: Option<String>) -> PicsyncResult<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    if context.client().login(username, &password).await? {
        println!("Logged in as {}", username);
    } else {
        println!("Login failed: invalid username or password");
    }
    Ok(())
}

/// Handle the `logout` command
pub async fn logout(context: &AppContext) -> PicsyncResult<()> {
    context.client().logout().await?;
    println!("Logged out");
    Ok(())
}

fn read_password() -> PicsyncResult<String> {
    print!("Password: ");
    std::io::stdout()
        .flush()
        .map_err(|e| ConfigError::new(format!("Failed to write prompt: {}", e)))?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| ConfigError::new(format!("Failed to read password: {}", e)))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
