//! Liveness and readiness endpoints.
//!
//! These answer with plain JSON, not the `{code, msg, data}` envelope.

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{HealthStatus, ReadyStatus};

/// GET /health
pub async fn health(client: &ApiClient) -> Result<HealthStatus, ApiError> {
    client.get_plain("/health").await
}

/// GET /ready: reports `degraded` when the database or cache is unreachable.
pub async fn ready(client: &ApiClient) -> Result<ReadyStatus, ApiError> {
    client.get_plain("/ready").await
}
