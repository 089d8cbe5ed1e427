use serde::{Deserialize, Serialize};

/// Response to `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "healthy" when the service is up.
    pub status: String,
    /// Sessions the service is currently holding.
    #[serde(default)]
    pub active_sessions: u64,
}

impl HealthStatus {
    /// True when the service reports itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
