//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the liveness handlers
//! - Nest the extension registry under `/api`
//! - Wire up middleware (CORS, request ID, tracing, timeout)
//! - Serve on a bound listener until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, extract::State, routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Settings;
use crate::http::cors::cors_layer;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::http::response::{MessageBody, StatusBody};
use crate::routing::{ExtensionRegistry, API_BASE};

/// State injected into the liveness handlers.
#[derive(Clone)]
struct AppState {
    welcome: Arc<str>,
}

/// HTTP server for the API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server from settings and the populated extension registry.
    pub fn new(settings: &Settings, registry: ExtensionRegistry) -> Self {
        Self {
            router: Self::build_router(settings, registry),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost first: CORS, request ID, trace span, timeout.
    #[allow(deprecated)]
    pub fn build_router(settings: &Settings, registry: ExtensionRegistry) -> Router {
        let state = AppState {
            welcome: Arc::from(settings.welcome_message()),
        };

        Router::new()
            .route("/", get(welcome_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .merge(registry.into_router(API_BASE))
            .layer(TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
            .layer(set_request_id_layer())
            .layer(cors_layer(&settings.cors_origins))
    }

    /// The assembled router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn welcome_handler(State(state): State<AppState>) -> Json<MessageBody> {
    Json(MessageBody::new(state.welcome.as_ref()))
}

async fn health_handler() -> Json<StatusBody> {
    Json(StatusBody::HEALTHY)
}
