//! HTTP front-end.

pub mod handler;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

use crate::config::Settings;
use crate::signing::SignatureVerifier;
use crate::tts::{ProviderContext, ProviderRegistry};
use crate::{Error, ErrorContext, Result};

/// Deadline for a single provider call unless configured otherwise.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Headroom the whole-request timeout keeps over the provider deadline.
const REQUEST_TIMEOUT_HEADROOM: Duration = Duration::from_secs(5);

/// Shared, read-only state handed to every request.
#[derive(Debug)]
pub struct AppState {
    pub verifier: SignatureVerifier,
    pub registry: ProviderRegistry,
    pub default_provider: String,
    /// A provider call running longer than this fails as a provider error.
    pub upstream_timeout: Duration,
}

impl AppState {
    pub fn new(
        verifier: SignatureVerifier,
        registry: ProviderRegistry,
        default_provider: impl Into<String>,
    ) -> Result<Self> {
        let default_provider = default_provider.into();
        if !registry.contains(&default_provider) {
            return Err(Error::setup_with_context(
                format!("default provider '{}' is not registered", default_provider),
                ErrorContext::new()
                    .with_field("DEFAULT_PROVIDER")
                    .with_details(registry.names().join(", ")),
            ));
        }
        Ok(Self {
            verifier,
            registry,
            default_provider,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        })
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// State with the built-in providers, built from startup settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| Error::setup(format!("Failed to create HTTP client: {}", e)))?;
        let registry = ProviderRegistry::with_defaults(ProviderContext::new(
            http,
            settings.providers.clone(),
        ));
        Ok(Self::new(
            SignatureVerifier::new(&settings.signature_key)?,
            registry,
            &settings.default_provider,
        )?
        .with_upstream_timeout(settings.request_timeout()))
    }
}

/// Routes without server-level middleware beyond access logging.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tts.ogg", get(handler::tts))
        .route("/health", get(health))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// [`router`] plus the whole-request timeout used in production.
///
/// The outer timeout sits above `upstream_timeout`, so a stalled provider is
/// answered by the handler with a 500 before the layer would answer 408.
pub fn app(state: Arc<AppState>) -> Router {
    let request_timeout = state.upstream_timeout + REQUEST_TIMEOUT_HEADROOM;
    router(state).layer(TimeoutLayer::new(request_timeout))
}

async fn health() -> &'static str {
    "OK"
}

/// Bind the configured address and serve until Ctrl-C / SIGTERM.
pub async fn serve(settings: &Settings) -> Result<()> {
    settings.validate()?;
    let state = Arc::new(AppState::from_settings(settings)?);
    info!(
        providers = ?state.registry.names(),
        default_provider = %state.default_provider,
        "providers registered"
    );

    let service = app(state);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "webtts listening");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("webtts stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
