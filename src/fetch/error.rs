use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Could not build HTTP client: {0}")]
    ClientSetup(String),
    #[error("HTTP request to '{0}' failed: {1}")]
    RequestFailed(String, String),
    #[error("Could not read response body from '{0}': {1}")]
    UnreadableBody(String, String),
}
