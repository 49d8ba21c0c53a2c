use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

mod config;
mod database;
mod handlers;
mod helpers;
mod integrations;
mod jobs;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "SmartNET API"
    }))
}

#[get("/health")]
async fn health(state: web::Data<handlers::AppState>) -> impl Responder {
    if state.db.is_healthy().await {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        }))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("smartnet-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let db = helpers::database::initialize_database().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to initialize database: {e:#}"),
        )
    })?;

    let (config, config_path) = config::ApiConfig::load().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to load config: {e}"),
        )
    })?;
    tracing::info!("Config loaded from {}", config_path.display());

    if config.owner.user.is_none() || config.owner.pass.is_none() {
        tracing::warn!("Owner credentials are not set; owner sign-in will fail");
    }

    let (host, port) = config.listen_address();
    tracing::info!("Server will listen on {}:{}", host, port);

    let config = Arc::new(config);
    let mailer = integrations::mailer::mailer_from_config(&config.email);
    let state = web::Data::new(handlers::AppState::new(db.clone(), config.clone(), mailer));

    let expiry_manager = Arc::new(jobs::magic_link_expiry::MagicLinkExpiryManager::new(
        db.async_connection.clone(),
    ));
    expiry_manager
        .clone()
        .spawn(jobs::magic_link_expiry::SWEEP_INTERVAL);

    let server = HttpServer::new(move || {
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type", "X-Owner-Dev-Secret"])
                .supports_credentials()
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type", "X-Owner-Dev-Secret"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(hello)
            .service(health)
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    let shutdown_manager = expiry_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        shutdown_manager.shutdown();

        handle.stop(true).await;
    });

    server.await
}
