//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::{config::Config, execution::ExecutionClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    db: PgPool,

    /// Redis connection manager
    redis: ConnectionManager,

    /// Client for the code execution service
    executor: Arc<dyn ExecutionClient>,

    /// Application configuration
    config: Config,

    /// Cancelled on shutdown; in-flight submissions derive child tokens from it
    shutdown: CancellationToken,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        db: PgPool,
        redis: ConnectionManager,
        executor: Arc<dyn ExecutionClient>,
        config: Config,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                redis,
                executor,
                config,
                shutdown,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a clone of the Redis connection manager
    pub fn redis(&self) -> ConnectionManager {
        self.inner.redis.clone()
    }

    /// Get a handle to the execution client
    pub fn executor(&self) -> Arc<dyn ExecutionClient> {
        self.inner.executor.clone()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the shutdown token
    pub fn shutdown(&self) -> &CancellationToken {
        &self.inner.shutdown
    }
}
