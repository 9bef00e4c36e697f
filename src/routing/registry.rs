//! Extension registry: the mount point for feature routers.
//!
//! # Responsibilities
//! - Accept child routers under unique path prefixes
//! - Answer the registry's own base path with an identity payload
//! - Freeze everything into one axum `Router` before serving
//!
//! # Design Decisions
//! - Mounting is a build-time operation; the result is immutable
//! - Duplicate or nested prefixes are rejected, never silently merged
//! - Prefixes are literal (no path parameters) and case-sensitive

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::http::response::MessageBody;

/// Errors raised while building the routing table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// A router is already mounted under this prefix, or one nesting with it.
    #[error("prefix '{prefix}' is already mounted")]
    Conflict { prefix: String },

    /// The prefix cannot be used as a mount point.
    #[error("invalid prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },
}

#[derive(Debug)]
struct Mount {
    prefix: String,
    router: Router,
}

/// Builder for the routing table under the API base path.
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = ExtensionRegistry::new("AceFlow GEO API v1");
/// registry.mount("/intents", intents::router())?;
/// let api = registry.into_router("/api");
/// ```
#[derive(Debug)]
pub struct ExtensionRegistry {
    identity: String,
    mounts: Vec<Mount>,
}

impl ExtensionRegistry {
    /// Create an empty registry whose root answers with `identity`.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            mounts: Vec::new(),
        }
    }

    /// Register a child router under `prefix`.
    pub fn mount(&mut self, prefix: &str, router: Router) -> Result<&mut Self, RouteError> {
        let prefix = normalize_prefix(prefix)?;
        if let Some(existing) = self.mounts.iter().find(|m| overlaps(&m.prefix, &prefix)) {
            tracing::warn!(prefix = %prefix, existing = %existing.prefix, "Prefix collides with a mounted router");
            return Err(RouteError::Conflict { prefix });
        }

        tracing::debug!(prefix = %prefix, "Router mounted");
        self.mounts.push(Mount { prefix, router });
        Ok(self)
    }

    /// Mounted prefixes, in mount order.
    pub fn prefixes(&self) -> Vec<&str> {
        self.mounts.iter().map(|m| m.prefix.as_str()).collect()
    }

    /// Build the routing table with every child nested under `base`.
    ///
    /// The identity handler answers both `{base}` and `{base}/`.
    pub fn into_router(self, base: &str) -> Router {
        let base = base.trim_end_matches('/');
        let identity: Arc<str> = Arc::from(self.identity);

        let root = if base.is_empty() {
            Router::new().route("/", get(root_handler))
        } else {
            Router::new()
                .route(base, get(root_handler))
                .route(&format!("{}/", base), get(root_handler))
        };
        let mut router = root.with_state(identity);

        for mount in self.mounts {
            router = router.nest(&format!("{}{}", base, mount.prefix), mount.router);
        }
        router
    }
}

async fn root_handler(State(identity): State<Arc<str>>) -> Json<MessageBody> {
    Json(MessageBody::new(identity.as_ref()))
}

/// True when one prefix equals the other or nests inside it on a segment
/// boundary (`/a` and `/a/b`, but not `/a` and `/ab`).
fn overlaps(a: &str, b: &str) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    match long.strip_prefix(short) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn normalize_prefix(prefix: &str) -> Result<String, RouteError> {
    let invalid = |reason| RouteError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason,
    };

    if !prefix.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("the registry root is reserved"));
    }
    if trimmed.contains("//") {
        return Err(invalid("must not contain empty segments"));
    }
    if trimmed.contains(['{', '}', '*']) {
        return Err(invalid("must not contain path parameters or wildcards"));
    }
    Ok(trimmed.to_string())
}
