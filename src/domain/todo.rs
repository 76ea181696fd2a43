use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ObjectId;

/// A task item as stored and as rendered to clients.
///
/// `completed_at` is `Some` exactly when `completed` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(rename = "_creator", default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<ObjectId>,
}

/// Partial update accepted by PATCH. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }
}

/// Trims `raw` and returns `None` when nothing is left.
#[must_use]
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The `completedAt` value that must accompany a given `completed` flag.
#[must_use]
pub fn completion_timestamp(completed: bool, now: DateTime<Utc>) -> Option<i64> {
    completed.then(|| now.timestamp_millis())
}
