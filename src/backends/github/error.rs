use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("error while creating commit status: {0}")]
    CouldNotCreateStatus(#[source] FetchError),

    #[error("error code {0} received from GitHub.")]
    BadStatusCode(u16),

    #[error("error while serializing commit status: {0}")]
    MalformedRequest(#[source] serde_json::Error),
}
