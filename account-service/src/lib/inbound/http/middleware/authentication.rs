use std::sync::Arc;

use auth::JwtHandler;
use axum::extract::Request;
use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use super::AuthenticatedUser;
use super::Interceptor;
use super::Rejection;
use super::TOKEN_COOKIE;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;

/// Verifies the `token` cookie and attaches the caller's identity.
#[derive(Clone)]
pub struct AuthenticationGate {
    tokens: Arc<JwtHandler>,
}

impl AuthenticationGate {
    pub fn new(tokens: Arc<JwtHandler>) -> Self {
        Self { tokens }
    }
}

impl Interceptor for AuthenticationGate {
    fn intercept(&self, request: &mut Request) -> Result<(), Rejection> {
        let token = token_from_headers(request.headers()).ok_or_else(|| {
            tracing::warn!(uri = %request.uri(), "Request without token cookie");
            Rejection::MissingCredential
        })?;

        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::warn!(error = %e, "Token verification failed");
            Rejection::Unauthenticated
        })?;

        let user_id = UserId::from_string(&claims.subject).map_err(|e| {
            tracing::warn!(error = %e, "Token subject is not a user ID");
            Rejection::Unauthenticated
        })?;

        let role = Role::normalize(&claims.role);
        if claims.role.parse::<Role>().is_err() {
            tracing::warn!(%user_id, role = %claims.role, "Unrecognized role claim, treating as USER");
        }

        request
            .extensions_mut()
            .insert(AuthenticatedUser { user_id, role });

        Ok(())
    }
}

/// Find the token cookie across every `Cookie` header of the request.
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| token_from_cookie_header(header, TOKEN_COOKIE))
}

fn token_from_cookie_header<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    cookie_header.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name.trim() == cookie_name).then(|| value.trim())
    })
}
