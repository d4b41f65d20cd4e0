//! HTTP handlers for presence endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use super::dto::{AcceptedResponse, ActivityListResponse, RecordActivityRequest};
use crate::adapters::http::context::Caller;
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::OptionalAuth;
use crate::application::{
    GetPresenceHandler, GetPresenceQuery, ListActivitiesHandler, ListActivitiesQuery,
    PresenceView, RecordActivityCommand, RecordActivityHandler,
};
use crate::domain::foundation::SessionId;

#[derive(Clone)]
pub struct PresenceHandlers {
    pub record: Arc<RecordActivityHandler>,
    pub list: Arc<ListActivitiesHandler>,
    pub presence: Arc<GetPresenceHandler>,
}

/// First hop of `X-Forwarded-For`, else `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// POST /sessions/:id/activities
///
/// Always 202. Presence tracking never fails the client; anything that
/// cannot be recorded is logged and dropped.
pub async fn record_activity(
    State(handlers): State<PresenceHandlers>,
    OptionalAuth(user): OptionalAuth,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<RecordActivityRequest>>,
) -> (StatusCode, Json<AcceptedResponse>) {
    let accepted = (StatusCode::ACCEPTED, Json(AcceptedResponse::accepted()));

    let Ok(session_id) = session_id.parse::<SessionId>() else {
        tracing::debug!(session_id = %session_id, "activity for malformed session id dropped");
        return accepted;
    };
    let req = body.map(|Json(req)| req).unwrap_or_default();

    handlers
        .record
        .handle(RecordActivityCommand {
            session_id,
            user_id: user.map(|u| u.id),
            action: req.action,
            action_value: req.action_value,
            device_info: req.device_info,
            ip_address: client_ip(&headers),
        })
        .await;
    accepted
}

/// GET /sessions/:id/activities
pub async fn list_activities(
    State(handlers): State<PresenceHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
) -> Result<Json<ActivityListResponse>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let activities = handlers
        .list
        .handle(ListActivitiesQuery { session_id }, metadata)
        .await?;
    Ok(Json(ActivityListResponse { activities }))
}

/// GET /sessions/:id/presence
pub async fn get_presence(
    State(handlers): State<PresenceHandlers>,
    Caller(metadata): Caller,
    Path(session_id): Path<String>,
) -> Result<Json<PresenceView>, ApiError> {
    let session_id: SessionId = parse_id(&session_id, "session_id")?;
    let view = handlers
        .presence
        .handle(GetPresenceQuery { session_id }, metadata)
        .await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ip_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        headers.insert("x-real-ip", "10.0.0.9".parse().unwrap());
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));

        headers.remove("x-forwarded-for");
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.9"));

        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
