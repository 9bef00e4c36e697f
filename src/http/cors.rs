//! Cross-origin resource sharing policy.
//!
//! # Design Decisions
//! - Origins are matched exactly; an empty list rejects every cross-origin request
//! - Credentials are allowed, so `*` reflects the caller's origin instead of
//!   answering with a literal wildcard
//! - Methods and headers are mirrored from the preflight request

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build the CORS layer from configured origins.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if origins.iter().any(|origin| origin == "*") {
        tracing::debug!("CORS allows any origin");
        return layer.allow_origin(AllowOrigin::mirror_request());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping CORS origin that is not a valid header value");
                None
            }
        })
        .collect();

    tracing::debug!(origins = allowed.len(), "CORS allow list built");
    layer.allow_origin(AllowOrigin::list(allowed))
}
