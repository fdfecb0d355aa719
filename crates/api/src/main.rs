use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use labelops_api::config::{LogFormat, ServerConfig};
use labelops_api::router::build_app_router;
use labelops_api::state::AppState;
use labelops_db::mirror::LocalMirror;
use labelops_storage::{StorageBackend, StorageConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "labelops_api=debug,tower_http=debug".into());
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
    tracing::info!(
        host = %config.host,
        port = %config.port,
        fallback_mode = ?config.fallback_mode,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    // Lazy: the server must come up while the database is down.
    let pool = labelops_db::create_lazy_pool(&database_url, &config.pool_settings())
        .expect("Invalid DATABASE_URL");
    tracing::info!("Database connection pool created");

    match labelops_db::health_check(&pool).await {
        Ok(()) => {
            tracing::info!("Database health check passed");
            if config.run_migrations {
                match labelops_db::run_migrations(&pool).await {
                    Ok(()) => tracing::info!("Database migrations applied"),
                    Err(err) => tracing::error!(error = %err, "Failed to run database migrations"),
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "Database unreachable at startup, serving from the local mirror");
        }
    }

    // --- Local mirror ---
    let mirror = LocalMirror::load(config.fallback_dataset_path.as_deref())
        .expect("Failed to load the fallback dataset");
    tracing::info!(
        path = ?config.fallback_dataset_path,
        "Local mirror seeded"
    );

    // --- Object storage ---
    let storage_config = StorageConfig::from_env();
    let store = labelops_storage::build_store(&storage_config)
        .expect("Failed to configure object storage");
    let files_dir = match storage_config.backend {
        StorageBackend::Local => {
            std::fs::create_dir_all(&storage_config.local_dir)
                .expect("Failed to create the local storage directory");
            Some(storage_config.local_dir.clone())
        }
        StorageBackend::S3 => None,
    };

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        mirror: Arc::new(mirror),
        store,
    };

    let app = build_app_router(state, &config, files_dir.as_deref());

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    // In-flight requests get SHUTDOWN_TIMEOUT_SECS to finish once a signal
    // arrived.
    let drain_limit = Duration::from_secs(config.shutdown_timeout_secs);
    let drain_deadline = async move {
        match signalled_rx.await {
            Ok(()) => tokio::time::sleep(drain_limit).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Shutdown timeout elapsed with requests still in flight"
            );
        }
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
