//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → http_request spans carrying the request ID
//!
//! logging.rs installs the subscriber:
//!     → EnvFilter (RUST_LOG, or a default from Settings.debug)
//!     → fmt layer (pretty or JSON) to stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through all request spans

pub mod logging;
