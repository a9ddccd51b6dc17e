//! Database models for security clearances.

use crate::types::ClearanceId;
use sqlx::FromRow;

/// Database request for creating a new clearance level
#[derive(Debug, Clone)]
pub struct ClearanceCreateDBRequest {
    pub description: String,
}

/// Database response for a clearance level. Also the full-replace update payload.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ClearanceDBResponse {
    pub id: ClearanceId,
    pub description: String,
}
