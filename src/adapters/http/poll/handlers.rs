//! HTTP handlers for poll endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{CreatePollRequest, PollListResponse, RespondRequest};
use crate::adapters::http::context::{Caller, Host};
use crate::adapters::http::error::{parse_id, ApiError};
use crate::application::{
    CreatePollCommand, CreatePollHandler, EndPollCommand, EndPollHandler, GetPollHandler,
    GetPollQuery, ListPollsHandler, ListPollsQuery, PollView, RespondToPollCommand,
    RespondToPollHandler,
};
use crate::domain::foundation::{PollId, SessionId};
use crate::domain::poll::Poll;

#[derive(Clone)]
pub struct PollHandlers {
    pub create: Arc<CreatePollHandler>,
    pub list: Arc<ListPollsHandler>,
    pub get: Arc<GetPollHandler>,
    pub respond: Arc<RespondToPollHandler>,
    pub end: Arc<EndPollHandler>,
}

fn poll_path(session_id: &str, poll_id: &str) -> Result<(SessionId, PollId), ApiError> {
    Ok((parse_id(session_id, "session_id")?, parse_id(poll_id, "poll_id")?))
}

/// POST /sessions/:id/polls
pub async fn create_poll(
    State(handlers): State<PollHandlers>,
    Host(metadata): Host,
    Path(session_id): Path<String>,
    Json(req): Json<CreatePollRequest>,
) -> Result<Response, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let cmd = CreatePollCommand {
        session_id,
        question: req.question,
        options: req.options.into_iter().map(Into::into).collect(),
        is_anonymous: req.is_anonymous,
        is_multiple_choice: req.is_multiple_choice,
    };
    let poll = handlers.create.handle(cmd, metadata).await?;
    Ok((StatusCode::CREATED, Json(poll)).into_response())
}

/// GET /sessions/:id/polls
pub async fn list_polls(
    State(handlers): State<PollHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
) -> Result<Json<PollListResponse>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let polls = handlers
        .list
        .handle(ListPollsQuery { session_id }, metadata)
        .await?;
    Ok(Json(PollListResponse { polls }))
}

/// GET /sessions/:id/polls/:poll_id
pub async fn get_poll(
    State(handlers): State<PollHandlers>,
    Caller(metadata): Caller,
    Path((session_id, poll_id)): Path<(String, String)>,
) -> Result<Json<PollView>, ApiError> {
    let (session_id, poll_id) = poll_path(&session_id, &poll_id)?;
    let view = handlers
        .get
        .handle(GetPollQuery { session_id, poll_id }, metadata)
        .await?;
    Ok(Json(view))
}

/// POST /sessions/:id/polls/:poll_id/responses
pub async fn respond(
    State(handlers): State<PollHandlers>,
    Caller(metadata): Caller,
    Path((session_id, poll_id)): Path<(String, String)>,
    Json(req): Json<RespondRequest>,
) -> Result<Response, ApiError> {
    let (session_id, poll_id) = poll_path(&session_id, &poll_id)?;
    let response = handlers
        .respond
        .handle(
            RespondToPollCommand {
                session_id,
                poll_id,
                option_id: req.option_id,
            },
            metadata,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// POST /sessions/:id/polls/:poll_id/end
pub async fn end_poll(
    State(handlers): State<PollHandlers>,
    Caller(metadata): Caller,
    Path((session_id, poll_id)): Path<(String, String)>,
) -> Result<Json<Poll>, ApiError> {
    let (session_id, poll_id) = poll_path(&session_id, &poll_id)?;
    let poll = handlers
        .end
        .handle(EndPollCommand { session_id, poll_id }, metadata)
        .await?;
    Ok(Json(poll))
}
