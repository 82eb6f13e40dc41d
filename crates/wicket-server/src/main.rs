use std::path::PathBuf;

use wicket_server::config::{load_config, load_secret};
use wicket_server::{build_router, build_state, observability, run_revocation_gc};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From the first CLI argument
    CliArgument,
    /// From the WICKET_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (wicket.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument"),
            Self::EnvironmentVariable => write!(f, "environment variable (WICKET_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

fn resolve_config_path() -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = std::env::args().nth(1) {
        return (Some(PathBuf::from(path)), ConfigSource::CliArgument);
    }
    if let Ok(path) = std::env::var("WICKET_CONFIG") {
        return (Some(PathBuf::from(path)), ConfigSource::EnvironmentVariable);
    }
    (None, ConfigSource::Default)
}

#[tokio::main]
async fn main() {
    // Load .env if present, so WICKET_SECRET can be set for local development.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let (config_path, source) = resolve_config_path();
    let config = match load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path
            .as_deref()
            .unwrap_or_else(|| std::path::Path::new("wicket.toml"))
            .display(),
        source = %source,
        "Configuration loaded"
    );

    let secret = match load_secret() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    let (state, revoked_tokens) = match build_state(&config, &secret) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("Startup error: {e}");
            std::process::exit(2);
        }
    };

    // Revocation records only need to outlive their tokens; sweep on the
    // access-lifetime cadence.
    tokio::spawn(run_revocation_gc(
        revoked_tokens,
        config.auth.access_token_lifetime,
    ));

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(%addr, "Wicket server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install shutdown signal handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
