//! Request and response bodies for breakout endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::RoomView;
use crate::domain::breakout::{AssignmentMode, RoundRequest};
use crate::domain::foundation::UserId;

/// `assignments` wins over `auto_assign`; with neither, rooms start empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenRoundRequest {
    pub room_count: usize,
    pub names: Vec<String>,
    /// Room index (zero-based) to user ids.
    pub assignments: Option<BTreeMap<usize, Vec<String>>>,
    pub auto_assign: bool,
}

impl From<OpenRoundRequest> for RoundRequest {
    fn from(req: OpenRoundRequest) -> Self {
        let mode = match req.assignments {
            Some(assignments) => AssignmentMode::Manual(
                assignments
                    .into_iter()
                    .map(|(index, users)| {
                        (index, users.into_iter().filter_map(|u| UserId::new(u).ok()).collect())
                    })
                    .collect(),
            ),
            None if req.auto_assign => AssignmentMode::Auto,
            None => AssignmentMode::None,
        };

        RoundRequest {
            room_count: req.room_count,
            names: req.names,
            mode,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloseAllResponse {
    pub closed: usize,
}
