//! HTTP handlers for breakout room endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{CloseAllResponse, OpenRoundRequest, RoomListResponse};
use crate::adapters::http::context::{Caller, Host};
use crate::adapters::http::error::{parse_id, ApiError};
use crate::application::{
    BreakoutRoomsView, CloseAllRoomsCommand, CloseAllRoomsHandler, CloseRoomCommand,
    CloseRoomHandler, GetRoomsHandler, GetRoomsQuery, JoinRoomCommand, JoinRoomHandler,
    LeaveRoomCommand, LeaveRoomHandler, OpenRoundCommand, OpenRoundHandler,
};
use crate::domain::breakout::BreakoutParticipant;
use crate::domain::foundation::{BreakoutRoomId, SessionId};

#[derive(Clone)]
pub struct BreakoutHandlers {
    pub open: Arc<OpenRoundHandler>,
    pub rooms: Arc<GetRoomsHandler>,
    pub join: Arc<JoinRoomHandler>,
    pub leave: Arc<LeaveRoomHandler>,
    pub close: Arc<CloseRoomHandler>,
    pub close_all: Arc<CloseAllRoomsHandler>,
}

fn room_path(session_id: &str, room_id: &str) -> Result<(SessionId, BreakoutRoomId), ApiError> {
    Ok((parse_id(session_id, "session_id")?, parse_id(room_id, "room_id")?))
}

/// POST /sessions/:id/breakout-rooms
pub async fn open_round(
    State(handlers): State<BreakoutHandlers>,
    Host(metadata): Host,
    Path(session_id): Path<String>,
    Json(req): Json<OpenRoundRequest>,
) -> Result<Response, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let rooms = handlers
        .open
        .handle(
            OpenRoundCommand {
                session_id,
                request: req.into(),
            },
            metadata,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(RoomListResponse { rooms })).into_response())
}

/// GET /sessions/:id/breakout-rooms
///
/// Hosts get every open room; other callers get only their own.
pub async fn get_rooms(
    State(handlers): State<BreakoutHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
) -> Result<Json<BreakoutRoomsView>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let view = handlers
        .rooms
        .handle(GetRoomsQuery { session_id }, metadata)
        .await?;
    Ok(Json(view))
}

/// POST /sessions/:id/breakout-rooms/close-all
pub async fn close_all_rooms(
    State(handlers): State<BreakoutHandlers>,
    Host(metadata): Host,
    Path(session_id): Path<String>,
) -> Result<Json<CloseAllResponse>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let closed = handlers
        .close_all
        .handle(CloseAllRoomsCommand { session_id }, metadata)
        .await?;
    Ok(Json(CloseAllResponse { closed }))
}

/// POST /sessions/:id/breakout-rooms/:room_id/close
pub async fn close_room(
    State(handlers): State<BreakoutHandlers>,
    Host(metadata): Host,
    Path((session_id, room_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (session_id, room_id) = room_path(&session_id, &room_id)?;
    handlers
        .close
        .handle(CloseRoomCommand { session_id, room_id }, metadata)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sessions/:id/breakout-rooms/:room_id/join
pub async fn join_room(
    State(handlers): State<BreakoutHandlers>,
    Caller(metadata): Caller,
    Path((session_id, room_id)): Path<(String, String)>,
) -> Result<Json<BreakoutParticipant>, ApiError> {
    let (session_id, room_id) = room_path(&session_id, &room_id)?;
    let row = handlers
        .join
        .handle(JoinRoomCommand { session_id, room_id }, metadata)
        .await?;
    Ok(Json(row))
}

/// POST /sessions/:id/breakout-rooms/:room_id/leave
pub async fn leave_room(
    State(handlers): State<BreakoutHandlers>,
    Caller(metadata): Caller,
    Path((session_id, room_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (session_id, room_id) = room_path(&session_id, &room_id)?;
    handlers
        .leave
        .handle(LeaveRoomCommand { session_id, room_id }, metadata)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
