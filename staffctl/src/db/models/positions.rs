//! Database models for positions.

use crate::types::PositionId;
use sqlx::FromRow;

/// Database request for creating a new position
#[derive(Debug, Clone)]
pub struct PositionCreateDBRequest {
    pub title: String,
}

/// Database response for a position. Also the full-replace update payload.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PositionDBResponse {
    pub id: PositionId,
    pub title: String,
}
