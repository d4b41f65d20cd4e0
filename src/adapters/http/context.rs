//! Extractors that turn the authenticated caller into `CommandMetadata`.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use super::middleware::{AuthRejection, RequireAuth, RequireHost};
use crate::domain::foundation::{AuthenticatedUser, CommandMetadata};

const REQUEST_ID_HEADER: &str = "x-request-id";

fn metadata_for(user: &AuthenticatedUser, parts: &Parts) -> CommandMetadata {
    let metadata = CommandMetadata::for_user(user).with_source("http");
    match parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(request_id) => metadata.with_correlation_id(request_id),
        None => metadata,
    }
}

/// Any authenticated caller.
#[derive(Debug, Clone)]
pub struct Caller(pub CommandMetadata);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        Ok(Caller(metadata_for(&user, parts)))
    }
}

/// An authenticated instructor or admin.
#[derive(Debug, Clone)]
pub struct Host(pub CommandMetadata);

#[async_trait]
impl<S> FromRequestParts<S> for Host
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireHost(user) = RequireHost::from_request_parts(parts, state).await?;
        Ok(Host(metadata_for(&user, parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Role, UserId};

    #[tokio::test]
    async fn caller_carries_request_id_as_correlation_id() {
        let mut request = axum::http::Request::builder()
            .uri("/x")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(())
            .unwrap();
        request.extensions_mut().insert(AuthenticatedUser::new(
            UserId::new("ana").unwrap(),
            "ana@example.com",
            None,
            Role::Student,
        ));
        let (mut parts, _) = request.into_parts();

        let Caller(metadata) = Caller::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(metadata.user_id.as_str(), "ana");
        assert_eq!(metadata.correlation_id(), "req-42");
        assert_eq!(metadata.source(), Some("http"));
    }
}
