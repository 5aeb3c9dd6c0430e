use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::{cors_layer, router};
use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::{DocumentStore, MemoryStore, MongoStore};
use crate::payments::StripeClient;
use crate::state::AppState;

/// Open the store, serve until a shutdown signal, then release the store
pub async fn handle(config: AppConfig, port: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    info!("Starting tools manufacturer API in {:?} mode", config.environment);

    let payments = Arc::new(StripeClient::new(&config.payments).context("failed to build payment client")?);
    let tokens = TokenService::new(&config.security.token_secret, config.security.token_ttl_days);

    let (store, mongo): (Arc<dyn DocumentStore>, Option<MongoStore>) = if in_memory {
        warn!("Using in-memory store; data will not persist");
        (Arc::new(MemoryStore::new()), None)
    } else {
        let mongo = MongoStore::connect(&config.database)
            .await
            .context("failed to connect to MongoDB")?;
        (Arc::new(mongo.clone()), Some(mongo))
    };

    let state = AppState::new(store, tokens, payments, config.payments.currency.clone());
    let app = router(state, cors_layer(&config.server.cors_origins));

    let bind_addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("listening to port {}", listener.local_addr()?.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(mongo) = mongo {
        mongo.shutdown().await;
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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
    info!("Shutdown signal received");
}
