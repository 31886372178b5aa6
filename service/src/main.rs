// darkroom_service/src/main.rs

mod config;
mod db;
mod errors;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use darkroom::services::memory::{MemoryOrderStore, MemoryProfiles};
use darkroom::services::{OrderStore, ProfileDirectory};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting darkroom order intake server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let (orders, profiles): (Arc<dyn OrderStore>, Arc<dyn ProfileDirectory>) = match &app_config.database_url {
    Some(url) => {
      let pool = db::connect(url).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to the database.");
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
      })?;
      if app_config.run_migrations {
        db::migrate(&pool).await.map_err(|e| {
          tracing::error!(error = %e, "Failed to run database migrations.");
          std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
      }
      (
        Arc::new(db::PgOrderStore::new(pool.clone())),
        Arc::new(db::PgProfileDirectory::new(pool)),
      )
    }
    None => {
      tracing::warn!("DATABASE_URL not set; orders are kept in memory and lost on restart.");
      (Arc::new(MemoryOrderStore::new()), Arc::new(MemoryProfiles::new()))
    }
  };

  let app_state = AppState::build(app_config.clone(), orders, profiles).map_err(|e| {
    tracing::error!(error = %e, "Failed to build application state.");
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
  })?;

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
