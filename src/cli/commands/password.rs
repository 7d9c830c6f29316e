use clap::Args;
use serde_json::json;

use crate::auth::PasswordHasher;
use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;

#[derive(Args)]
pub struct HashPasswordArgs {
    #[arg(help = "Plaintext password")]
    pub password: String,

    #[arg(long, help = "bcrypt cost (defaults to PASSWORD_HASH_COST)")]
    pub cost: Option<u32>,
}

pub fn handle(
    config: &AppConfig,
    args: HashPasswordArgs,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let cost = args.cost.unwrap_or(config.security.password_hash_cost);
    let hasher = PasswordHasher::new(cost)?;
    let digest = hasher.hash(&args.password)?;

    match output_format {
        OutputFormat::Text => println!("{}", digest),
        OutputFormat::Json => utils::output_success(
            &output_format,
            "Password hashed",
            Some(json!({ "hashed_password": digest, "cost": cost })),
        )?,
    }
    Ok(())
}
