use std::env;

use chrono::FixedOffset;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub latency_scale: f64,
    pub rider_id: String,
    pub history_utc_offset_minutes: i32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let latency_scale: f64 = parse_or_default("LATENCY_SCALE", 1.0)?;
        if !latency_scale.is_finite() || latency_scale < 0.0 {
            return Err(AppError::Internal(format!(
                "invalid LATENCY_SCALE: {latency_scale} must be a non-negative number"
            )));
        }

        let config = Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            latency_scale,
            rider_id: env::var("RIDER_ID").unwrap_or_else(|_| "user-1".to_string()),
            history_utc_offset_minutes: parse_or_default("HISTORY_UTC_OFFSET_MINUTES", 0)?,
        };

        config.history_offset()?;
        Ok(config)
    }

    /// The rider's local offset used when matching history entries by calendar date.
    pub fn history_offset(&self) -> Result<FixedOffset, AppError> {
        FixedOffset::east_opt(self.history_utc_offset_minutes * 60).ok_or_else(|| {
            AppError::Internal(format!(
                "invalid HISTORY_UTC_OFFSET_MINUTES: {}",
                self.history_utc_offset_minutes
            ))
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
