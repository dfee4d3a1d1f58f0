// ── Change-control task ──

use serde::{Deserialize, Serialize};

/// A controller task created when a topology change is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub status: String,
    /// System MAC of the device the task targets, when known.
    pub device_id: Option<String>,
    pub description: Option<String>,
}
