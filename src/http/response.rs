use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Successful outcome of a webhook, rendered as `{"message": ...}`.
#[derive(Debug, Serialize)]
pub struct RelayResponse {
    #[serde(skip)]
    status_code: StatusCode,
    message: String,
}

impl RelayResponse {
    pub fn ok<T: Into<String>>(message: T) -> Self {
        Self {
            status_code: StatusCode::OK,
            message: message.into(),
        }
    }

    pub fn created<T: Into<String>>(message: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let mut response = Json(self).into_response();
        *response.status_mut() = status_code;
        response
    }
}
