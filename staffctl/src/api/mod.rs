//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! Every route lives under `/v1`:
//!
//! - **Healthcheck** (`/v1/healthcheck`): Liveness, environment and version
//! - **Positions** (`/v1/positions/*`): Position titles
//! - **Clearances** (`/v1/clearances/*`): Security clearance levels
//! - **Resources** (`/v1/resources/*`): People available for staffing
//! - **Resource requests** (`/v1/resource-requests/*`): Staffing demands
//!
//! Collections support `GET` (filtered, paginated list) and `POST` (create). Members
//! support `GET`, `PATCH` (partial update merged onto the stored entity) and `DELETE`.
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`. API documentation
//! is available at `/v1/docs` when the server is running.

pub mod handlers;
pub mod models;
