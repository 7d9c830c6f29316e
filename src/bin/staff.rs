use clap::Parser;
use staff_api::cli::{utils, Cli, OutputFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("staff_api=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = staff_api::cli::run(cli).await {
        match (&output_format, std::env::var("CLI_VERBOSE").as_deref()) {
            (OutputFormat::Json, _) => utils::output_error(&output_format, &e.to_string(), None)?,
            (OutputFormat::Text, Ok("true") | Ok("1")) => eprintln!("Error: {e:?}"),
            (OutputFormat::Text, _) => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
