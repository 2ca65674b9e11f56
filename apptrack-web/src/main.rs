//! Apptrack Web Server
//!
//! Appointment scheduling REST API with JWT authentication.

use anyhow::Context;
use apptrack_core::{init_logging, LoggingConfig};
use apptrack_web::server::ApptrackServerBuilder;

use clap::Parser;

/// Apptrack Web Server - appointment scheduling REST API
#[derive(Parser)]
#[command(name = "apptrack-web")]
#[command(about = "An appointment scheduling web service")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "5001")]
    port: u16,

    /// Enable development mode (allows an ephemeral JWT secret)
    #[arg(long)]
    dev: bool,

    /// Database URL, e.g. sqlite:apptrack.db
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables before reading configuration
    dotenvy::dotenv().ok();

    let logging = LoggingConfig {
        level: args.log_level.clone(),
        ..LoggingConfig::default()
    };
    init_logging(&logging).context("failed to initialize logging")?;

    let mut builder = ApptrackServerBuilder::new()
        .host(args.host)
        .port(args.port)
        .dev_mode(args.dev);

    if let Some(database_url) = args.database_url {
        builder = builder.database_url(database_url);
    }

    let server = builder.build().await.context("failed to build server")?;

    println!("🚀 Starting Apptrack Web Server");
    println!("📍 Server: http://{}", server.config().address());
    println!("📖 API docs: http://{}/swagger-ui", server.config().address());

    server.start().await.context("server error")?;

    Ok(())
}
