//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (coercion handles syntactic)
//! - Check the database URL selects a compiled driver
//! - Check CORS origins are in exact origin form
//! - Validate value ranges (timeouts > 0, pool bounds ordered)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>
//! - Runs before settings are handed to any subsystem

use std::net::IpAddr;

use axum::http::HeaderValue;
use url::{Host, Url};

use crate::config::schema::Settings;

/// Database URL schemes backed by a compiled driver.
pub const SUPPORTED_SCHEMES: &[&str] = &["sqlite", "postgres", "postgresql"];

/// A single semantic problem with a resolved setting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate resolved settings, collecting every problem found.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.app_name.trim().is_empty() {
        errors.push(ValidationError::new("app_name", "must not be empty"));
    }

    match Url::parse(&settings.database_url) {
        Ok(url) if !SUPPORTED_SCHEMES.contains(&url.scheme()) => {
            errors.push(ValidationError::new(
                "database_url",
                format!(
                    "unsupported scheme '{}', expected one of {}",
                    url.scheme(),
                    SUPPORTED_SCHEMES.join(", ")
                ),
            ));
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(ValidationError::new("database_url", format!("not a valid URI: {}", e)));
        }
    }

    for origin in &settings.cors_origins {
        if let Err(message) = check_origin(origin) {
            errors.push(ValidationError::new("cors_origins", format!("'{}' {}", origin, message)));
        }
    }

    let host = settings.server_host.as_str();
    if host.parse::<IpAddr>().is_err() && Host::parse(host).is_err() {
        errors.push(ValidationError::new(
            "server_host",
            format!("'{}' is neither an IP address nor a host name", host),
        ));
    }

    if settings.request_timeout_secs == 0 {
        errors.push(ValidationError::new("request_timeout_secs", "must be greater than 0"));
    }
    if settings.db_connect_timeout_secs == 0 {
        errors.push(ValidationError::new("db_connect_timeout_secs", "must be greater than 0"));
    }
    if settings.db_max_connections == 0 {
        errors.push(ValidationError::new("db_max_connections", "must be greater than 0"));
    }
    if settings.db_min_connections > settings.db_max_connections {
        errors.push(ValidationError::new(
            "db_min_connections",
            format!("must not exceed db_max_connections ({})", settings.db_max_connections),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// An allowed origin is `*` or an http(s) origin exactly as browsers send
/// it in the `Origin` header (lowercase host, no path, no default port).
fn check_origin(origin: &str) -> Result<(), String> {
    if origin == "*" {
        return Ok(());
    }
    if HeaderValue::from_str(origin).is_err() {
        return Err("is not a valid header value".to_string());
    }
    let url = Url::parse(origin).map_err(|e| format!("is not a valid URL: {}", e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err("must use http or https".to_string());
    }
    let canonical = url.origin().ascii_serialization();
    if canonical != origin {
        return Err(format!("is not an exact origin, did you mean '{}'?", canonical));
    }
    Ok(())
}
