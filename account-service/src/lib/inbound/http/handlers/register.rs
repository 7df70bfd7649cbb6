use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UserSummary;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Form(body): Form<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .user_service
        .register(body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|summary| ApiSuccess::new(StatusCode::CREATED, summary.into()))
}

/// Form body for registration. Missing fields arrive empty and fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl RegisterRequest {
    fn into_command(self) -> RegisterCommand {
        RegisterCommand::new(self.username, self.email, self.password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub username: String,
    pub email: String,
}

impl From<UserSummary> for RegisterResponseData {
    fn from(summary: UserSummary) -> Self {
        Self {
            username: summary.username,
            email: summary.email,
        }
    }
}
