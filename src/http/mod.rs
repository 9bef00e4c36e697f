//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → cors.rs (preflight answered, allow-origin decided)
//!     → request.rs (request ID assigned, span opened)
//!     → handler: liveness (/, /health) or extension registry (/api/...)
//!     → response.rs (JSON payloads)
//!     → Send to client
//! ```

pub mod cors;
pub mod request;
pub mod response;
pub mod server;

pub use cors::cors_layer;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{MessageBody, StatusBody};
pub use server::HttpServer;
