use serde::Serialize;

use crate::application::handlers::support::resolve_names;
use crate::domain::breakout::BreakoutRoom;
use crate::domain::foundation::{ClassroomError, Timestamp, UserId};
use crate::ports::{BreakoutRepository, UserDirectory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomParticipantView {
    pub user_id: UserId,
    pub display_name: String,
    pub joined_at: Timestamp,
}

/// An open room with its current occupants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomView {
    pub room: BreakoutRoom,
    pub participants: Vec<RoomParticipantView>,
}

pub(super) async fn room_views(
    breakouts: &dyn BreakoutRepository,
    users: &dyn UserDirectory,
    rooms: Vec<BreakoutRoom>,
) -> Result<Vec<RoomView>, ClassroomError> {
    let mut occupants = Vec::with_capacity(rooms.len());
    for room in &rooms {
        occupants.push(breakouts.open_participants(&room.id).await?);
    }
    let ids: Vec<UserId> = occupants
        .iter()
        .flatten()
        .map(|p| p.user_id.clone())
        .collect();
    let names = resolve_names(users, &ids).await?;

    Ok(rooms
        .into_iter()
        .zip(occupants)
        .map(|(room, rows)| RoomView {
            room,
            participants: rows
                .into_iter()
                .map(|p| RoomParticipantView {
                    display_name: names.get(&p.user_id).cloned().unwrap_or_default(),
                    user_id: p.user_id,
                    joined_at: p.joined_at,
                })
                .collect(),
        })
        .collect())
}
