//! Request and response bodies for presence endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::presence::ActivityRecord;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordActivityRequest {
    /// `join`, `leave`, `chat`, `hand_raise`, ... Unknown values are dropped.
    pub action: String,
    pub action_value: Option<String>,
    pub device_info: Option<String>,
}

/// Body of every `POST /activities` answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptedResponse {
    pub status: String,
}

impl AcceptedResponse {
    pub fn accepted() -> Self {
        Self {
            status: "accepted".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityListResponse {
    pub activities: Vec<ActivityRecord>,
}
