//! Authentication middleware and extractors for axum.
//!
//! - `auth_middleware` validates a Bearer token and injects the user, or
//!   the `AuthError` when validation fails
//! - `RequireAuth` requires an authenticated user (401/503 otherwise)
//! - `RequireHost` additionally requires the Instructor or Admin role (403)
//! - `OptionalAuth` yields `None` for anonymous requests
//!
//! The middleware only depends on the `SessionValidator` port, so the JWT
//! adapter and the test mock plug in the same way.
//!
//! ```text
//! Request → auth_middleware → AuthenticatedUser in extensions
//!                                      ↓
//!                              Handler → RequireAuth / RequireHost / OptionalAuth
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates `Authorization: Bearer <token>` when present.
///
/// Never rejects. Requests without a token pass through untouched; a token
/// that fails validation leaves its `AuthError` in the extensions, and the
/// extractors decide. `OptionalAuth` routes (activity recording) treat such
/// a caller as anonymous.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(e) => {
            tracing::debug!(error = %e, "bearer token rejected");
            request.extensions_mut().insert(e);
        }
    }
    next.run(request).await
}

fn auth_failure(error: AuthError) -> Response {
    let (status, message) = match &error {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Auth service unavailable: {}", msg);
            (StatusCode::SERVICE_UNAVAILABLE, "Authentication service unavailable")
        }
    };

    (
        status,
        Json(ErrorResponse {
            code: "AUTH_ERROR".to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Extractor that requires an authenticated user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(RequireAuth(user.clone()));
        }
        match parts.extensions.get::<AuthError>() {
            Some(error) => Err(AuthRejection::Invalid(error.clone())),
            None => Err(AuthRejection::Unauthenticated),
        }
    }
}

/// Extractor for routes reserved to instructors and admins.
#[derive(Debug, Clone)]
pub struct RequireHost(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireHost
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if user.role.can_host() {
            Ok(RequireHost(user))
        } else {
            Err(AuthRejection::Forbidden)
        }
    }
}

/// Extractor for optional authentication.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    Unauthenticated,
    /// A token was sent but did not validate.
    Invalid(AuthError),
    /// Authenticated, but the role may not use this route.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthRejection::Invalid(error) => return auth_failure(error),
            AuthRejection::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "Authentication required")
            }
            AuthRejection::Forbidden => (
                StatusCode::FORBIDDEN,
                "PERMISSION_DENIED",
                "Only instructors and administrators may do this",
            ),
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::domain::foundation::{Role, UserId};
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            "test@example.com",
            Some("Test User".to_string()),
            role,
        )
    }

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let mut request = axum::http::Request::builder().uri("/test").body(()).unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn require_auth_extracts_user_or_rejects() {
        let mut parts = parts_with(Some(user(Role::Student)));
        let RequireAuth(found) = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found.email, "test@example.com");

        let mut parts = parts_with(None);
        assert_eq!(
            RequireAuth::from_request_parts(&mut parts, &()).await.unwrap_err(),
            AuthRejection::Unauthenticated
        );
    }

    #[tokio::test]
    async fn require_host_rejects_students() {
        let mut parts = parts_with(Some(user(Role::Student)));
        assert_eq!(
            RequireHost::from_request_parts(&mut parts, &()).await.unwrap_err(),
            AuthRejection::Forbidden
        );

        for role in [Role::Instructor, Role::Admin] {
            let mut parts = parts_with(Some(user(role)));
            assert!(RequireHost::from_request_parts(&mut parts, &()).await.is_ok());
        }
    }

    #[tokio::test]
    async fn optional_auth_is_none_when_absent() {
        let mut parts = parts_with(None);
        let OptionalAuth(found) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(found.is_none());
    }

    fn app(validator: MockSessionValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route(
                "/whoami",
                get(|OptionalAuth(user): OptionalAuth| async move {
                    user.map(|u| u.id.to_string()).unwrap_or_else(|| "anonymous".to_string())
                }),
            )
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(app: Router, auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn middleware_injects_user_for_valid_token() {
        let validator = MockSessionValidator::new().with_test_user("good", "ana", Role::Student);
        assert_eq!(call(app(validator), Some("Bearer good")).await, (StatusCode::OK, "ana".to_string()));
    }

    #[tokio::test]
    async fn middleware_passes_anonymous_requests_through() {
        let (status, body) = call(app(MockSessionValidator::new()), None).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "anonymous"));

        let (_, body) = call(app(MockSessionValidator::new()), Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn optional_routes_treat_bad_tokens_as_anonymous() {
        let (status, body) = call(app(MockSessionValidator::new()), Some("Bearer nope")).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "anonymous"));
    }

    fn strict_app(validator: MockSessionValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route(
                "/me",
                get(|RequireAuth(user): RequireAuth| async move { user.id.to_string() }),
            )
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    #[tokio::test]
    async fn required_routes_reject_bad_tokens() {
        let mut request = axum::http::Request::builder().uri("/me");
        request = request.header("Authorization", "Bearer nope");
        let response = strict_app(MockSessionValidator::new())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let down = MockSessionValidator::new().with_error(AuthError::service_unavailable("down"));
        let response = strict_app(down)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/me")
                    .header("Authorization", "Bearer any")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn require_auth_reports_the_token_error() {
        let mut request = axum::http::Request::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(AuthError::TokenExpired);
        let (mut parts, _) = request.into_parts();

        assert_eq!(
            RequireAuth::from_request_parts(&mut parts, &()).await.unwrap_err(),
            AuthRejection::Invalid(AuthError::TokenExpired)
        );
    }
}
