//! Test utilities for handler and integration tests.

use crate::config::{Config, DatabaseConfig, PoolSettings};
use axum_test::TestServer;
use sqlx::PgPool;
use std::time::Duration;

/// Build the full router around a `#[sqlx::test]` pool and wrap it in a test server.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let app = crate::Application::new_with_pool(create_test_config(), Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig {
            // The pool is supplied by the test harness
            url: "unused".to_string(),
            pool: PoolSettings {
                max_connections: 1,
                min_connections: 0,
                ..Default::default()
            },
            query_timeout: Duration::from_secs(5),
        },
        ..Default::default()
    }
}
