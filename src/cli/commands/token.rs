use anyhow::Context;
use serde_json::json;

use crate::auth::TokenService;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

/// Print a token for `username` without going through `/login`.
pub fn handle(config: AppConfig, username: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let tokens = TokenService::new(&config.auth);
    let issued = tokens.issue(username).context("failed to issue token")?;

    match output_format {
        OutputFormat::Text => println!("{}", issued.token),
        OutputFormat::Json => println!(
            "{}",
            json!({
                "expiresAt": issued.expires_at(),
                "subject": issued.claims.sub,
                "token": issued.token,
            })
        ),
    }
    Ok(())
}
