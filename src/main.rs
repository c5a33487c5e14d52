mod config;
mod error;
mod extract;
mod logging;
mod models;
mod payload;
mod replicate;
mod request_id;
mod router;

use clap::Parser;
use config::RelayConfig;
use replicate::ReplicateClient;
use router::AppState;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, info, warn};

#[derive(Parser, Debug)]
#[command(name = "image-edit-relay")]
#[command(about = "HTTP relay forwarding image edits to a hosted model")]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0")]
    ip: String,

    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file in addition to stdout
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    let log_level = Level::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", args.log_level);
        Level::INFO
    });
    logging::init_logging(log_level, args.log_file.as_deref());

    let config = Arc::new(RelayConfig::from_env());

    let http_client = Arc::new(
        reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client"),
    );

    let replicate = match &config.api_token {
        Some(token) => Some(Arc::new(ReplicateClient::new(
            http_client,
            config.api_base.clone(),
            token.clone(),
        ))),
        None => {
            warn!("REPLICATE_API_TOKEN not set; edit requests will fail until it is configured");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        replicate,
    };
    let app = router::app(state);

    let bind_address = format!("{}:{}", args.ip, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server started on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
