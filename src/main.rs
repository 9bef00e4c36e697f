//! AceFlow GEO API server.
//!
//! # Architecture Overview
//!
//! ```text
//!   .env file ─┐
//!   process env ┼─▶ SettingsResolver ──▶ Arc<Settings>
//!   defaults ───┘                            │
//!                                            ▼
//!                               ConnectionManager::start()
//!                                            │
//!                                            ▼
//!     Client ──▶ CORS ─▶ request ID ─▶ trace ─▶ timeout ─▶ Router
//!                                                          ├─ GET /
//!                                                          ├─ GET /health
//!                                                          └─ /api ─▶ ExtensionRegistry
//!                                            │
//!                        SIGINT/SIGTERM ─▶ Shutdown ─▶ drain ─▶ ConnectionManager::stop()
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use aceflow_geo_api::config::SettingsResolver;
use aceflow_geo_api::lifecycle::{default_registry, spawn_signal_listener, Application, Shutdown};
use aceflow_geo_api::observability::logging;

#[derive(Debug, Parser)]
#[command(name = "aceflow-geo-api", version, about = "AceFlow GEO API server")]
struct Cli {
    /// Env file layered between defaults and the process environment.
    #[arg(long, value_name = "PATH", default_value = ".env")]
    env_file: PathBuf,

    /// Skip the env file entirely.
    #[arg(long, conflicts_with = "env_file")]
    no_env_file: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_file = (!cli.no_env_file).then_some(cli.env_file.as_path());
    let settings = match SettingsResolver::standard(env_file).get_settings() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init_fallback();
            tracing::error!(error = %e, "Configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&settings);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %settings.bind_address(),
        request_timeout_secs = settings.request_timeout_secs,
        "Configuration loaded"
    );

    let app = match Application::build(settings.clone(), default_registry(&settings)).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    match app.run(shutdown.signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
