use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::policy::PRIVILEGE_READ;
use crate::auth::PasswordHasher;
use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore};
use crate::services::{NewUser, UserService};

#[derive(Args)]
pub struct CreateUserArgs {
    #[arg(long, help = "Numeric user id")]
    pub id: i64,

    #[arg(long, help = "Unique username")]
    pub username: String,

    #[arg(long, help = "Plaintext password, hashed before storing")]
    pub password: String,

    #[arg(long, help = "Display name")]
    pub full_name: Option<String>,

    #[arg(long, help = "Email address")]
    pub email: Option<String>,

    #[arg(long, default_value_t = PRIVILEGE_READ, help = "0 = none, 1 = read, 2 = read/write")]
    pub privilege: i32,
}

impl From<CreateUserArgs> for NewUser {
    fn from(args: CreateUserArgs) -> Self {
        NewUser {
            id: args.id,
            username: args.username,
            password: args.password,
            full_name: args.full_name,
            email: args.email,
            disabled: false,
            privilege: args.privilege,
        }
    }
}

/// Insert a user straight into Postgres. This is how the first read/write
/// account gets created, since `POST /api/v1/user` already needs one.
pub async fn handle(
    config: &AppConfig,
    args: CreateUserArgs,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let manager = DatabaseManager::connect(&config.database)
        .await
        .context("create-user needs DATABASE_URL pointing at the API database")?;

    let hasher = PasswordHasher::new(config.security.password_hash_cost)?;
    let service = UserService::new(Arc::new(PgStore::new(manager.pool())), hasher);
    let result = service.create(args.into()).await;
    manager.close().await;

    let profile = result?;
    utils::output_success(
        &output_format,
        &format!("User '{}' created", profile.username),
        Some(json!({ "id": profile.id, "privilege": profile.privilege })),
    )
}
