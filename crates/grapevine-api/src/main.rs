//! Grapevine API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use grapevine_api::config::Config;
use grapevine_api::error::AppError;
use grapevine_api::state::AppState;
use grapevine_api::{build_router, telemetry};
use grapevine_blob_store::memory_blob_store::InMemoryBlobStore;
use grapevine_blob_store::pg_blob_store::PgBlobStore;
use grapevine_clients::datamuse::DatamuseRhymeLookup;
use grapevine_clients::whisper_sender::HttpWhisperSender;
use grapevine_core::clock::SystemClock;
use grapevine_core::rng::{DeterministicRng, StdDeterministicRng};
use grapevine_core::store::BlobStore;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let tracer_provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Grapevine API server");

    let result = serve(config).await;

    if let Some(provider) = tracer_provider
        && let Err(err) = provider.shutdown()
    {
        tracing::error!("Failed to flush spans: {}", err);
    }

    result?;
    Ok(())
}

async fn serve(config: Config) -> Result<(), AppError> {
    let blobs = blob_store(&config).await?;
    let rhymes = DatamuseRhymeLookup::new(&config.rhyme_api_url, config.timeouts.rhyme_lookup)?;
    let sender = HttpWhisperSender::new(config.timeouts.delivery)?;
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(StdDeterministicRng::from_entropy()));

    let app_state = AppState::new(
        Arc::new(SystemClock),
        rng,
        blobs,
        Arc::new(rhymes),
        Arc::new(sender),
        config.timeouts,
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Grapevine API server stopped");
    Ok(())
}

/// Selects PostgreSQL when `DATABASE_URL` is set, the in-memory store
/// otherwise.
async fn blob_store(config: &Config) -> Result<Arc<dyn BlobStore>, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, games are kept in memory only");
        return Ok(Arc::new(InMemoryBlobStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    let store = PgBlobStore::new(pool);
    store.ensure_schema().await?;
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Unable to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Unable to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Received shutdown signal");
}
