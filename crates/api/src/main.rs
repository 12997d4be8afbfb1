use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crowdfund_api::config::ServerConfig;
use crowdfund_api::router::build_app_router;
use crowdfund_api::state::AppState;
use crowdfund_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "crowdfund_api=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = config.bind_addr().expect("HOST must be an IP address");
    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    tracing::info!(%addr, cors_origins = ?config.cors_origins, "Configuration loaded");

    let pool = prepare_database(&config).await;
    let app = build_app_router(AppState::new(pool.clone(), config));

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "Listening");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                stop_rx.await.ok();
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined.expect("Server task panicked").expect("Server exited with an error");
            pool.close().await;
            return;
        }
        () = wait_for_signal() => {}
    }

    stop_tx.send(()).ok();
    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(Ok(Ok(()))) => tracing::info!("In-flight requests drained"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server failed while draining"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task aborted while draining"),
        Err(_) => {
            tracing::warn!(
                timeout_secs = drain_timeout.as_secs(),
                "Drain timed out, dropping open connections"
            );
            server.abort();
        }
    }

    pool.close().await;
    tracing::info!("Shutdown complete");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, ping and migrate. Any failure aborts startup.
async fn prepare_database(config: &ServerConfig) -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = crowdfund_db::create_pool(&url, config.db_max_connections)
        .await
        .expect("Failed to create database pool");
    crowdfund_db::health_check(&pool)
        .await
        .expect("Database is not answering");
    crowdfund_db::run_migrations(&pool)
        .await
        .expect("Database migrations failed");

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database ready"
    );
    pool
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn wait_for_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
