//! GetRoomsHandler - breakout rooms as seen by the caller.

use std::sync::Arc;

use serde::Serialize;

use super::views::{room_views, RoomView};
use crate::application::handlers::support::{authorize_owner_or_admin, load_session};
use crate::domain::foundation::{ClassroomError, CommandMetadata, SessionId};
use crate::ports::{BreakoutRepository, SessionRepository, UserDirectory};

#[derive(Debug, Clone)]
pub struct GetRoomsQuery {
    pub session_id: SessionId,
}

/// The owner (or an admin) sees every open room; anyone else only the room
/// they currently occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "rooms", rename_all = "snake_case")]
pub enum BreakoutRoomsView {
    AllRooms(Vec<RoomView>),
    OwnRoom(Option<RoomView>),
}

pub struct GetRoomsHandler {
    sessions: Arc<dyn SessionRepository>,
    breakouts: Arc<dyn BreakoutRepository>,
    users: Arc<dyn UserDirectory>,
}

impl GetRoomsHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        breakouts: Arc<dyn BreakoutRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            sessions,
            breakouts,
            users,
        }
    }

    pub async fn handle(
        &self,
        query: GetRoomsQuery,
        metadata: CommandMetadata,
    ) -> Result<BreakoutRoomsView, ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &query.session_id).await?;

        if authorize_owner_or_admin(&session, &metadata, "view breakout rooms").is_ok() {
            let rooms = self.breakouts.open_rooms(&query.session_id).await?;
            let views = room_views(self.breakouts.as_ref(), self.users.as_ref(), rooms).await?;
            return Ok(BreakoutRoomsView::AllRooms(views));
        }

        let Some(row) = self
            .breakouts
            .open_participation(&query.session_id, &metadata.user_id)
            .await?
        else {
            return Ok(BreakoutRoomsView::OwnRoom(None));
        };
        let room = self
            .breakouts
            .find_room(&row.room_id)
            .await?
            .filter(|room| room.is_open());
        let Some(room) = room else {
            return Ok(BreakoutRoomsView::OwnRoom(None));
        };

        let mut views = room_views(self.breakouts.as_ref(), self.users.as_ref(), vec![room]).await?;
        Ok(BreakoutRoomsView::OwnRoom(views.pop()))
    }
}
