//! Wares web server binary.

use clap::Parser;
use wares_web::{WaresServerBuilder, WebConfig};

#[derive(Parser, Debug)]
#[command(name = "wares-web")]
#[command(about = "HTTP server for the wares demo: auth and product catalog")]
#[command(version)]
struct Args {
    /// Host to bind to (defaults to WARES_HOST, then 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (defaults to WARES_PORT, then 8080)
    #[arg(short, long)]
    port: Option<u16>,

    /// Database URL, e.g. sqlite:wares.db
    #[arg(long)]
    database_url: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Layer the command-line flags over the environment-derived config.
/// Flags win; absent flags leave the WARES_* values alone.
fn apply_args(mut config: WebConfig, args: &Args) -> WebConfig {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database_url) = &args.database_url {
        config.database_url = database_url.clone();
    }
    config
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Environment first so WARES_* variables are visible to from_env.
    dotenvy::dotenv().ok();

    wares_core::init_logging(&format!(
        "wares_web={},tower_http={}",
        args.log_level, args.log_level
    ));

    if std::env::var("WARES_JWT_SECRET").is_err() {
        eprintln!("⚠️  WARES_JWT_SECRET is not set; using the built-in development secret.");
    }

    let config = apply_args(WebConfig::from_env(), &args);

    let server = match WaresServerBuilder::new().config(config).build().await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
