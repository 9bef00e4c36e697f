//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Assembly (at startup):
//!     ExtensionRegistry::new(identity)
//!     → mount(prefix, Router)  (normalize, reject duplicates)
//!     → into_router("/api")    (root handler + nested children)
//!     → Freeze as immutable axum Router
//!
//! Incoming Request:
//!     /api, /api/         → identity payload
//!     /api/{prefix}/...   → mounted child router
//!     anything else       → 404
//! ```
//!
//! # Design Decisions
//! - Routes assembled at startup, immutable at runtime
//! - Prefix matching only, delegated to axum's nesting
//! - Deterministic: one prefix maps to exactly one child

pub mod registry;

pub use registry::{ExtensionRegistry, RouteError};

/// Base path the extension registry is mounted under.
pub const API_BASE: &str = "/api";
