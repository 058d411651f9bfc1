// Main entry point for Abacus

use abacus::api::{create_router, AppState};
use abacus::auth::audit_logger::AuditLogger;
use abacus::auth::auth_middleware::AuthState;
use abacus::auth::credentials::{CredentialVerifier, StaticCredentials};
use abacus::auth::token::TokenAuthority;
use abacus::config::Config;
use abacus::core::errors::AbacusError;
use abacus::engine::pipeline::CalculationPipeline;
use abacus::state::history::{HistoryStore, InMemoryHistoryStore};

use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = Config::from_env().context("configuration error")?;

    // 2. Initialize tracing subscriber with config values
    // Must be done only once - tracing panics if init() is called multiple times
    init_tracing(&config)?;

    info!("Starting Abacus");

    info!(
        bind_address = %config.bind_address,
        port = config.port,
        token_ttl_secs = config.token_ttl_secs,
        "Configuration loaded"
    );

    // 3. Initialize token authority
    let token_authority = Arc::new(TokenAuthority::new(
        &config.token_secret,
        config.token_ttl_secs,
    ));

    // 4. Initialize credential verifier (single fixed pair)
    let credentials: Arc<dyn CredentialVerifier + Send + Sync> = Arc::new(
        StaticCredentials::new(config.auth_username.clone(), config.auth_password.clone()),
    );

    // 5. Initialize history store and calculation pipeline
    let history: Arc<dyn HistoryStore + Send + Sync> = Arc::new(InMemoryHistoryStore::new());
    let pipeline = Arc::new(CalculationPipeline::new(history.clone()));

    info!("Calculation pipeline initialized");

    // 6. Initialize audit logger
    let audit_logger = Arc::new(AuditLogger::new());

    // 7. Create AuthState
    let auth_state = Arc::new(AuthState {
        token_authority: token_authority.clone(),
        audit_logger: audit_logger.clone(),
    });

    // 8. Create AppState
    let app_state = AppState {
        token_authority,
        credentials,
        pipeline,
        history,
        audit_logger,
        config: Arc::new(config.clone()),
    };

    // 9. Create router
    let router = create_router(&app_state, auth_state).with_state(app_state);

    info!("Router created");

    // 10. Start HTTP server
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!(addr = %addr, "Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber based on configuration
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    // Parse log level
    let level = parse_log_level(&config.log_level)?;

    // Create filter from RUST_LOG env var or config
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_env_filter(filter);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> Result<tracing::Level, AbacusError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(AbacusError::Configuration(format!(
            "Invalid log level: {}",
            level
        ))),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}
