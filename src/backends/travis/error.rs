use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Debug, Error)]
pub enum TravisError {
    #[error("error while fetching build '{0}': {1}")]
    CouldNotFetchBuild(String, #[source] FetchError),

    #[error("error while requesting a build: {0}")]
    CouldNotTriggerBuild(#[source] FetchError),

    #[error("error code {0} received from Travis.")]
    BadStatusCode(u16),

    #[error("error while serializing Travis request: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    #[error("error while parsing Travis response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}
