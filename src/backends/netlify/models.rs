use serde::{Deserialize, Serialize};

pub const DEPLOY_PREVIEW_CONTEXT: &str = "deploy-preview";

/// Deploy notification posted by Netlify.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeployEvent {
    #[serde(default)]
    pub deploy_ssl_url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl DeployEvent {
    pub fn is_deploy_preview(&self) -> bool {
        self.context() == DEPLOY_PREVIEW_CONTEXT
    }

    pub fn deploy_ssl_url(&self) -> &str {
        self.deploy_ssl_url.as_deref().unwrap_or_default()
    }

    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or_default()
    }

    pub fn context(&self) -> &str {
        self.context.as_deref().unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}
