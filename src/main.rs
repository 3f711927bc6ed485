//! Submission grader - Application Entry Point

use std::{net::SocketAddr, sync::Arc};

use axum::{extract::DefaultBodyLimit, middleware, Router};
use redis::Client as RedisClient;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use submission_grader::{
    config::CONFIG,
    constants::{API_BASE_PATH, MAX_SOURCE_CODE_SIZE, MAX_STDIN_SIZE},
    db,
    execution::HttpExecutionClient,
    handlers,
    middleware::{logging_middleware, rate_limit_middleware},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting submission grader...");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    tracing::info!("Connecting to Redis...");
    let redis_client = RedisClient::open(CONFIG.redis.url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;

    let executor = HttpExecutionClient::new(&CONFIG.execution)?;
    tracing::info!(base_url = %CONFIG.execution.base_url, "Execution service client ready");

    let shutdown = CancellationToken::new();
    let state = AppState::new(
        db_pool,
        redis_conn,
        Arc::new(executor),
        CONFIG.clone(),
        shutdown.clone(),
    );

    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(DefaultBodyLimit::disable())
                .map_response(|res: axum::http::Response<_>| res.map(axum::body::Body::new))
                // JSON framing on top of source and stdin
                .layer(RequestBodyLimitLayer::new(
                    (MAX_SOURCE_CODE_SIZE + MAX_STDIN_SIZE + 64 * 1024) as usize,
                ))
                .map_request(|req: axum::http::Request<_>| req.map(axum::body::Body::new))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_middleware,
                )),
        )
        .with_state(state);

    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown))
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into());

    let registry = tracing_subscriber::registry().with(filter);

    if CONFIG.server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on Ctrl+C or SIGTERM and cancels every in-flight submission
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, cancelling in-flight submissions");
    shutdown.cancel();
}
