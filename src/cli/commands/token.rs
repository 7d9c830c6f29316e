use clap::Args;
use serde_json::json;

use crate::auth::policy::PRIVILEGE_READ;
use crate::auth::{Claims, TokenIssuer, TokenVerifier};
use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;

#[derive(Args)]
pub struct IssueTokenArgs {
    #[arg(long, help = "Token subject")]
    pub username: String,

    #[arg(long, default_value_t = PRIVILEGE_READ, help = "Privilege level carried by the token")]
    pub privilege: i32,

    #[arg(long, help = "Lifetime in minutes (defaults to ACCESS_TOKEN_EXPIRE_MINUTES)")]
    pub ttl_minutes: Option<i64>,
}

#[derive(Args)]
pub struct VerifyTokenArgs {
    #[arg(help = "Encoded access token")]
    pub token: String,
}

/// Sign a token without a password check. Meant for operators holding the secret.
pub fn issue(config: &AppConfig, args: &IssueTokenArgs) -> anyhow::Result<String> {
    let issuer = TokenIssuer::new(&config.security)?;
    let ttl = match args.ttl_minutes {
        Some(minutes) => chrono::Duration::try_minutes(minutes)
            .ok_or_else(|| anyhow::anyhow!("ttl of {} minutes is out of range", minutes))?,
        None => issuer.default_ttl(),
    };
    Ok(issuer.issue(&args.username, args.privilege, ttl)?)
}

pub fn verify(config: &AppConfig, token: &str) -> anyhow::Result<Claims> {
    let verifier = TokenVerifier::new(&config.security)?;
    verifier
        .verify(token)
        .map_err(|e| anyhow::anyhow!("Token rejected: {}", e))
}

pub fn handle_issue(
    config: &AppConfig,
    args: IssueTokenArgs,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let token = issue(config, &args)?;
    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => utils::output_success(
            &output_format,
            "Token issued",
            Some(json!({ "access_token": token, "token_type": "bearer" })),
        )?,
    }
    Ok(())
}

pub fn handle_verify(
    config: &AppConfig,
    args: VerifyTokenArgs,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    // Rejections are reported once, by the binary
    let claims = verify(config, &args.token)?;
    utils::output_success(
        &output_format,
        "Token is valid",
        Some(serde_json::to_value(&claims)?),
    )
}
