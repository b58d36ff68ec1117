use serde::Serialize;
use strum::{AsRefStr, Display};
use thiserror::Error;

/// Commit status vocabulary understood by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusState {
    Success,
    Failure,
    Error,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStatus {
    pub state: StatusState,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized status message '{0}'")]
pub struct UnrecognizedStatus(pub String);

const DESCRIPTION_PREFIX: &str = "The Travis CI tests";

/// Maps a Travis `status_message` onto a GitHub commit status.
///
/// Matching ignores case and surrounding whitespace. The description always
/// uses the lowercase wording.
pub fn normalize(status_message: &str) -> Result<NormalizedStatus, UnrecognizedStatus> {
    let (state, phrase) = match status_message.trim().to_lowercase().as_str() {
        "passed" => (StatusState::Success, "passed"),
        "fixed" => (StatusState::Success, "is fixed"),
        "failed" => (StatusState::Failure, "has failed"),
        "broken" => (StatusState::Failure, "is broken"),
        "still failing" => (StatusState::Failure, "is still failing"),
        "canceled" => (StatusState::Failure, "is canceled"),
        "errored" => (StatusState::Error, "is errored"),
        "pending" => (StatusState::Pending, "is pending"),
        _ => return Err(UnrecognizedStatus(status_message.to_owned())),
    };

    Ok(NormalizedStatus {
        state,
        description: format!("{DESCRIPTION_PREFIX} {phrase}"),
    })
}
