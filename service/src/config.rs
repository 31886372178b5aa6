// darkroom_service/src/config.rs

use crate::errors::{AppError, Result};
use darkroom::pricing::CouponPolicy;
use darkroom::schedule::BusinessCalendar;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Orders are kept in memory when unset.
  pub database_url: Option<String>,
  pub run_migrations: bool,

  /// Directory uploaded assets are written under.
  pub blob_root: PathBuf,
  /// Directory staged customer files are read from. Draft file paths are
  /// relative to it.
  pub staging_root: PathBuf,

  pub mail_sender: String,
  pub staff_notify_address: String,
  pub service_principal: String,

  pub business_utc_offset_minutes: i32,
  pub coupon_code: String,
  pub coupon_percent_off: u8,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    let blob_root = PathBuf::from(get_env("BLOB_ROOT").unwrap_or_else(|_| "./var/blobs".to_string()));
    let staging_root = PathBuf::from(get_env("STAGING_ROOT").unwrap_or_else(|_| "./var/staging".to_string()));
    let mail_sender = get_env("MAIL_SENDER").unwrap_or_else(|_| "orders@darkroom.local".to_string());
    let staff_notify_address = get_env("STAFF_NOTIFY_ADDRESS").unwrap_or_else(|_| "studio@darkroom.local".to_string());
    let service_principal = get_env("SERVICE_PRINCIPAL").unwrap_or_else(|_| "darkroom-intake".to_string());

    let business_utc_offset_minutes = get_env("BUSINESS_UTC_OFFSET_MINUTES")
      .unwrap_or_else(|_| "0".to_string())
      .parse::<i32>()
      .map_err(|e| AppError::Config(format!("Invalid BUSINESS_UTC_OFFSET_MINUTES: {}", e)))?;
    let coupon_code = get_env("COUPON_CODE").unwrap_or_else(|_| "DARKROOM10".to_string());
    let coupon_percent_off = get_env("COUPON_PERCENT_OFF")
      .unwrap_or_else(|_| "10".to_string())
      .parse::<u8>()
      .map_err(|e| AppError::Config(format!("Invalid COUPON_PERCENT_OFF: {}", e)))?;

    let config = Self {
      server_host,
      server_port,
      database_url,
      run_migrations,
      blob_root,
      staging_root,
      mail_sender,
      staff_notify_address,
      service_principal,
      business_utc_offset_minutes,
      coupon_code,
      coupon_percent_off,
    };
    // Fail at startup rather than on the first order.
    config.calendar()?;
    config.coupon()?;

    tracing::info!(
      persistence = if config.database_url.is_some() { "postgres" } else { "memory" },
      "Application configuration loaded successfully."
    );
    Ok(config)
  }

  pub fn calendar(&self) -> Result<BusinessCalendar> {
    BusinessCalendar::from_offset_minutes(self.business_utc_offset_minutes).ok_or_else(|| {
      AppError::Config(format!(
        "BUSINESS_UTC_OFFSET_MINUTES out of range: {}",
        self.business_utc_offset_minutes
      ))
    })
  }

  /// `None` when the coupon code is configured empty, which disables it.
  pub fn coupon(&self) -> Result<Option<CouponPolicy>> {
    if self.coupon_code.trim().is_empty() {
      return Ok(None);
    }
    CouponPolicy::new(self.coupon_code.trim(), self.coupon_percent_off)
      .map(Some)
      .map_err(|e| AppError::Config(format!("Invalid coupon configuration: {}", e)))
  }
}
