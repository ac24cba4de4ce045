// ── Audit trail shared by every record ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who created / last modified a record, and when. Server-maintained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}
