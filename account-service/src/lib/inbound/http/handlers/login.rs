use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::AppendHeaders;
use axum::response::IntoResponse;
use axum::Form;
use serde::Deserialize;

use super::ApiError;
use crate::domain::user::models::LoginCommand;
use crate::inbound::http::middleware::TOKEN_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Form(body): Form<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.user_service.login(body.into_command()).await?;

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
        "success",
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl LoginRequest {
    fn into_command(self) -> LoginCommand {
        LoginCommand::new(self.email, self.password)
    }
}

/// Session cookie without Max-Age or Expires; the token's own expiry governs.
fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Lax",
        TOKEN_COOKIE, token
    )
}
