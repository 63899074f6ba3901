use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a bearer token for a user id with the configured secret")]
    Issue {
        #[arg(help = "User id placed in the token subject")]
        user_id: i32,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_id, hours } => {
            let security = &config().security;
            let hours = hours.unwrap_or(security.jwt_expiry_hours);
            let token = generate_jwt(&Claims::new(user_id, hours), &security.jwt_secret)?;

            match output_format {
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("Token issued for user {}", user_id),
                    Some(json!({ "token": token, "user_id": user_id, "expires_in_hours": hours })),
                ),
            }
        }
    }
}
