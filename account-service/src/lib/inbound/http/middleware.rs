use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;

pub mod authentication;
pub mod authorization;
pub mod pipeline;

pub use authentication::AuthenticationGate;
pub use authorization::AuthorizationGate;
pub use pipeline::Pipeline;

/// Name of the cookie carrying the signed token.
pub const TOKEN_COOKIE: &str = "token";

/// A synchronous check run against a request before it reaches a handler.
///
/// An interceptor either lets the request through, possibly attaching
/// extensions for later stages, or rejects it.
pub trait Interceptor: Send + Sync + 'static {
    fn intercept(&self, request: &mut Request) -> Result<(), Rejection>;
}

/// Outcome of a failed gate check. The client only ever sees a generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingCredential,
    Unauthenticated,
    Forbidden,
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::MissingCredential => StatusCode::BAD_REQUEST,
            Rejection::Unauthenticated => StatusCode::UNAUTHORIZED,
            Rejection::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rejection::MissingCredential => "missing authentication token",
            Rejection::Unauthenticated => "invalid or expired token",
            Rejection::Forbidden => "forbidden",
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Identity attached to the request by the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("Handler requires an identity but no authentication gate ran");
                Rejection::Unauthenticated
            })
    }
}
