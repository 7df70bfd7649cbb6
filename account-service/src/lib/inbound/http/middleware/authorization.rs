use axum::extract::Request;

use super::AuthenticatedUser;
use super::Interceptor;
use super::Rejection;
use crate::domain::user::models::Role;

/// Admits only callers holding exactly one required role.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationGate {
    required: Role,
}

impl AuthorizationGate {
    pub fn new(required: Role) -> Self {
        Self { required }
    }
}

impl Interceptor for AuthorizationGate {
    fn intercept(&self, request: &mut Request) -> Result<(), Rejection> {
        let Some(identity) = request.extensions().get::<AuthenticatedUser>() else {
            tracing::error!("Authorization gate ran without an authenticated identity");
            return Err(Rejection::Forbidden);
        };

        if identity.role != self.required {
            tracing::warn!(
                user_id = %identity.user_id,
                role = %identity.role,
                required = %self.required,
                "Insufficient role"
            );
            return Err(Rejection::Forbidden);
        }

        Ok(())
    }
}
