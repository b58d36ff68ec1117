use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErrorCode {
    MissingSignature,
    InvalidSignature,
    SignatureKeyUnavailable(String),
    MissingPayload,
    MalformedEventBody(#[from] serde_json::Error),
    MalformedEventBodyField(String, String),
    UnknownStatusMessage(String),
    MissingRepositorySlug,
    InvalidDeploySignature,
    BuildInfoUnavailable(String),
    StatusUpdateFailed(String),
    BuildTriggerFailed(String),
}

#[derive(Serialize)]
pub struct ErrorCodeDetail {
    #[serde(skip)]
    status_code: StatusCode,
    internal_code: u32,
    message: String,
}

impl ErrorCode {
    pub fn details(&self) -> ErrorCodeDetail {
        self.into()
    }
}

impl ErrorCodeDetail {
    pub fn with_status_code<T: Into<String>>(
        status_code: StatusCode,
        internal_code: u32,
        message: T,
    ) -> Self {
        Self {
            internal_code,
            status_code,
            message: message.into(),
        }
    }

    pub fn unprocessable<T: Into<String>>(internal_code: u32, message: T) -> Self {
        Self::with_status_code(StatusCode::UNPROCESSABLE_ENTITY, internal_code, message)
    }

    pub fn server_error<T: Into<String>>(internal_code: u32, message: T) -> Self {
        Self::with_status_code(StatusCode::INTERNAL_SERVER_ERROR, internal_code, message)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn internal_code(&self) -> u32 {
        self.internal_code
    }
}

impl From<&ErrorCode> for ErrorCodeDetail {
    fn from(value: &ErrorCode) -> Self {
        match value {
            ErrorCode::MissingSignature => Self::unprocessable(1, "Missing Signature header"),
            ErrorCode::InvalidSignature => Self::unprocessable(2, "Invalid Signature"),
            ErrorCode::SignatureKeyUnavailable(e) => {
                Self::unprocessable(3, format!("Could not fetch signature key: '{}'", e))
            }
            ErrorCode::MissingPayload => Self::unprocessable(4, "Missing payload"),
            ErrorCode::MalformedEventBody(e) => {
                Self::unprocessable(5, format!("Malformed event body: '{}'", e))
            }
            ErrorCode::MalformedEventBodyField(field, e) => Self::unprocessable(
                6,
                format!("Malformed event body field '{}': '{}'", field, e),
            ),
            ErrorCode::UnknownStatusMessage(m) => {
                Self::unprocessable(7, format!("Unknown status message: '{}'", m))
            }
            ErrorCode::MissingRepositorySlug => {
                Self::unprocessable(8, "Missing repository slug")
            }
            ErrorCode::InvalidDeploySignature => {
                Self::unprocessable(9, "Invalid X-Webhook-Signature signature")
            }
            ErrorCode::BuildInfoUnavailable(e) => {
                Self::server_error(10, format!("Could not fetch build info: '{}'", e))
            }
            ErrorCode::StatusUpdateFailed(e) => {
                Self::server_error(11, format!("Could not update commit status: '{}'", e))
            }
            ErrorCode::BuildTriggerFailed(e) => {
                Self::server_error(12, format!("Could not trigger build: '{}'", e))
            }
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let detail = ErrorCodeDetail::from(self);
        f.write_str(&detail.message)
    }
}
