use serde::Serialize;

use crate::backends::travis::StatusState;

/// Body of `POST /repos/{owner}/{repo}/statuses/{sha}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommitStatus {
    pub state: StatusState,
    pub target_url: Option<String>,
    pub context: String,
    pub description: String,
}
