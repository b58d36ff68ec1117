use std::fmt;

use serde::{Deserialize, Serialize};

/// Travis build identifier, sent either as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BuildId {
    Number(u64),
    Text(String),
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Repository {
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Notification payload posted by Travis once a build changes state.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatusEvent {
    #[serde(default)]
    pub id: Option<BuildId>,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub head_commit: Option<String>,
    #[serde(default)]
    pub base_commit: Option<String>,
    #[serde(default)]
    pub build_url: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
}

impl StatusEvent {
    /// Commit the status belongs to: `head_commit`, then `commit`, then
    /// `base_commit`. Empty values are skipped.
    pub fn target_commit(&self) -> Option<&str> {
        [&self.head_commit, &self.commit, &self.base_commit]
            .into_iter()
            .flatten()
            .map(|c| c.as_str())
            .find(|c| !c.is_empty())
    }

    pub fn repository_slug(&self) -> Option<String> {
        let repository = self.repository.as_ref()?;
        match (&repository.owner_name, &repository.name) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
                Some(format!("{owner}/{name}"))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Stage {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildInfo {
    #[serde(default)]
    pub id: Option<BuildId>,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl BuildInfo {
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.name.as_str())
    }

    pub fn has_stage(&self, name: &str) -> bool {
        self.stage_names().any(|s| s.eq_ignore_ascii_case(name))
    }
}

/// Body of `POST /repo/{slug}/requests`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildRequest {
    pub message: String,
    pub request: BuildRequestDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildRequestDetail {
    pub branch: String,
    pub config: BuildRequestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildRequestConfig {
    pub env: BuildEnv,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildEnv {
    #[serde(rename = "TEST")]
    pub test: String,
    #[serde(rename = "SITE_URL")]
    pub site_url: String,
}

impl BuildRequest {
    pub fn new<T: Into<String>>(message: T, branch: T, test: T, site_url: T) -> Self {
        Self {
            message: message.into(),
            request: BuildRequestDetail {
                branch: branch.into(),
                config: BuildRequestConfig {
                    env: BuildEnv {
                        test: test.into(),
                        site_url: site_url.into(),
                    },
                },
            },
        }
    }
}
