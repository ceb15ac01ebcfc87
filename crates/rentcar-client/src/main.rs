use clap::Parser;
use rentcar_client::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file (from repo root when run inside the crate)
    dotenvy::from_filename("../../.env").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("rentcar_client=info")),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    if let Err(e) = cli::run_command(&cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
