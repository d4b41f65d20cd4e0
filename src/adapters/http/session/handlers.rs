//! HTTP handlers for session and registration endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    CreateSessionRequest, ListSessionsParams, RegisterRequest, RegisterResponse,
    SessionDetailsResponse, SessionListResponse, SessionResponse, UpdateSessionRequest,
};
use crate::adapters::http::context::{Caller, Host};
use crate::adapters::http::error::{parse_id, ApiError};
use crate::application::{
    CreateSessionHandler, EndSessionCommand, EndSessionHandler, GetSessionHandler,
    GetSessionQuery, ListSessionsHandler, ListSessionsQuery, RegisterCommand, RegisterHandler,
    RemoveSessionCommand, RemoveSessionHandler, UpdateSessionHandler,
};
use crate::domain::foundation::SessionId;

#[derive(Clone)]
pub struct SessionHandlers {
    pub create: Arc<CreateSessionHandler>,
    pub get: Arc<GetSessionHandler>,
    pub list: Arc<ListSessionsHandler>,
    pub update: Arc<UpdateSessionHandler>,
    pub end: Arc<EndSessionHandler>,
    pub remove: Arc<RemoveSessionHandler>,
    pub register: Arc<RegisterHandler>,
}

/// POST /sessions
pub async fn create_session(
    State(handlers): State<SessionHandlers>,
    Host(metadata): Host,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Response, ApiError> {
    let result = handlers.create.handle(req.into(), metadata).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(result.session))).into_response())
}

/// GET /sessions
pub async fn list_sessions(
    State(handlers): State<SessionHandlers>,
    Caller(metadata): Caller,
    Query(params): Query<ListSessionsParams>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let query = ListSessionsQuery {
        filter: params.into_filter(),
    };
    let summaries = handlers.list.handle(query, metadata).await?;
    Ok(Json(SessionListResponse {
        sessions: summaries.into_iter().map(Into::into).collect(),
    }))
}

/// GET /sessions/:id
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
) -> Result<Json<SessionDetailsResponse>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let details = handlers
        .get
        .handle(GetSessionQuery { session_id }, metadata)
        .await?;
    Ok(Json(details.into()))
}

/// PUT /sessions/:id
pub async fn update_session(
    State(handlers): State<SessionHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let session = handlers
        .update
        .handle(req.into_command(session_id), metadata)
        .await?;
    Ok(Json(session.into()))
}

/// DELETE /sessions/:id
pub async fn remove_session(
    State(handlers): State<SessionHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    handlers
        .remove
        .handle(RemoveSessionCommand { session_id }, metadata)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sessions/:id/end
pub async fn end_session(
    State(handlers): State<SessionHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let session = handlers
        .end
        .handle(EndSessionCommand { session_id }, metadata)
        .await?;
    Ok(Json(session.into()))
}

/// POST /sessions/:id/register
///
/// 201 for a new seat, 200 when the caller already had one.
pub async fn register(
    State(handlers): State<SessionHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
    body: Option<Json<RegisterRequest>>,
) -> Result<Response, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let password = body.and_then(|Json(req)| req.password);

    let result = handlers
        .register
        .handle(RegisterCommand { session_id, password }, metadata)
        .await?;
    let status = if result.already_registered {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(RegisterResponse::from(result))).into_response())
}
