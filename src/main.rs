//! MoodTunes - backend for an emotion-driven music recommendation app
//!
//! Users upload a photo, an external classifier names the dominant emotion,
//! and the YouTube Data API supplies music recommendations which users can
//! organize into playlists.

mod api;
mod config;
mod core;
mod db;
mod error;
mod models;
mod services;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// MoodTunes - emotion-driven music recommendation backend
#[derive(Parser, Debug)]
#[command(name = "moodtunes")]
#[command(version = "0.1.0")]
#[command(about = "Backend for an emotion-driven music recommendation app")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(log_level);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("MoodTunes v0.1.0 starting...");

    let paths = config::Paths::init(args.config)?;
    info!("Config directory: {:?}", paths.config_dir());

    start_moodtunes(args.host, args.port).await
}

async fn start_moodtunes(host: String, port: u16) -> Result<()> {
    use actix_cors::Cors;
    use actix_web::{middleware, web, App, HttpServer};

    // Load settings and fail fast on missing secrets before serving anything
    let mut settings = config::Settings::load()?;
    if settings.server_id.is_empty() {
        settings.server_id = uuid::Uuid::new_v4().to_string();
        settings.save()?;
    }
    settings.validate()?;

    info!("Setting up database...");
    db::setup_sqlite().await?;

    let services = web::Data::new(services::Services::new(settings));

    let addr = format!("{}:{}", host, port);
    info!("Server listening on http://{}", addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(services.clone())
            .configure(api::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
