//! # staffctl: Staffing Control Service
//!
//! `staffctl` keeps the records a consulting practice needs to staff its engagements: the
//! people available for work (resources), the job titles and security clearances they hold,
//! and the customer requests they are staffed against. It exposes a RESTful JSON API over
//! PostgreSQL.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL for all persistence.
//!
//! A request to `/v1/*` is routed to a handler in [`api::handlers`]. The handler decodes the
//! body and query into the models in [`api::models`], runs the field rules in [`validation`],
//! and then calls one of the repositories in [`db::handlers`] on a pooled connection. Each
//! repository call runs under the configured query timeout. Failures surface as
//! [`errors::Error`], which maps them to a status code and a JSON body.
//!
//! Partial updates (`PATCH`) read the stored row, merge the provided fields onto it, validate
//! the merged entity and write it back as a whole. Resource requests carry a `version`
//! counter so a stale client cannot silently overwrite a newer edit.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use staffctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = staffctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     staffctl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations are embedded in the binary and run on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! staffctl::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_utils;

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use axum::http::{self, HeaderValue};
use axum::{
    Router,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{ClearanceId, PositionId, ResourceId, ResourceRequestId, Version};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

impl AppState {
    /// Deadline applied to each repository call.
    pub fn query_timeout(&self) -> Duration {
        self.config.database.query_timeout
    }
}

/// Get the staffctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect the main pool and bring the schema up to date.
#[instrument(skip_all)]
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    info!("Connecting to database");
    let pool = db::pools::connect(&config.database.url, &config.database.pool).await?;
    migrator().run(&pool).await?;
    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allow_origin = if config.cors.allowed_origins.contains(&CorsOrigin::Wildcard) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PATCH,
            http::Method::DELETE,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(config.cors.allow_credentials)
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with every `/v1` endpoint, the API docs and middleware.
///
/// # Errors
///
/// Returns an error if the CORS configuration is invalid.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{clearances, healthcheck, positions, resource_requests, resources};

    let api_routes = Router::new()
        .route("/healthcheck", get(healthcheck::healthcheck))
        // Positions
        .route("/positions", get(positions::list_positions))
        .route("/positions", post(positions::create_position))
        .route(
            "/positions/{id}",
            get(positions::get_position)
                .patch(positions::update_position)
                .delete(positions::delete_position),
        )
        // Clearances
        .route("/clearances", get(clearances::list_clearances))
        .route("/clearances", post(clearances::create_clearance))
        .route(
            "/clearances/{id}",
            get(clearances::get_clearance)
                .patch(clearances::update_clearance)
                .delete(clearances::delete_clearance),
        )
        // Resources
        .route("/resources", get(resources::list_resources))
        .route("/resources", post(resources::create_resource))
        .route(
            "/resources/{id}",
            get(resources::get_resource)
                .patch(resources::update_resource)
                .delete(resources::delete_resource),
        )
        // Resource requests
        .route("/resource-requests", get(resource_requests::list_resource_requests))
        .route("/resource-requests", post(resource_requests::create_resource_request))
        .route(
            "/resource-requests/{id}",
            get(resource_requests::get_resource_request)
                .patch(resource_requests::update_resource_request)
                .delete(resource_requests::delete_resource_request),
        )
        .route("/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .with_state(state.clone());

    let router = Router::new()
        .nest("/v1", api_routes)
        .merge(Scalar::with_url("/v1/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;
    let router = router.layer(cors_layer);

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled service: router, shared state and the pool it owns.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations and builds
///    the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown future resolves, in-flight requests drain, then the
///    pool is closed and telemetry is flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application around an existing pool (migrations are still applied), or
    /// connect a fresh one when `pool` is `None`.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting staffctl with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            environment = %self.config.environment,
            "staffctl listening on http://{}, available at http://localhost:{}",
            bind_addr,
            self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
