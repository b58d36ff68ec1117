use std::{net::SocketAddr, str::FromStr};

use crate::repository_path::RepositoryPath;

pub const DEFAULT_GATED_STAGE: &str = "e2e";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Missing setting: '{0}'. Make sure the environment variable is set.")]
    MissingSetting(&'static str),
    #[error("Malformed bind IP: '{0}'. Make sure you entered a valid IP.")]
    MalformedBindIp(String),
    #[error("Malformed target repository: '{0}'. Expected 'owner/name'.")]
    MalformedTargetRepo(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    telemetry_url: Option<String>,
    travis_api_url: String,
    github_api_url: String,
    travis_access_token: String,
    github_oauth_token: String,
    target_repo: Option<String>,
    gated_stage: String,
    netlify_webhook_secret: Option<String>,
    bind_ip: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            telemetry_url: env_to_str("NTP_TELEMETRY_URL"),
            travis_api_url: env_to_str("NTP_TRAVIS_API_URL")
                .unwrap_or_else(|| "https://api.travis-ci.org".into()),
            github_api_url: env_to_str("NTP_GITHUB_API_URL")
                .unwrap_or_else(|| "https://api.github.com".into()),
            travis_access_token: env_to_str("NTP_TRAVIS_ACCESS_TOKEN").unwrap_or_default(),
            github_oauth_token: env_to_str("NTP_GITHUB_OAUTH_TOKEN").unwrap_or_default(),
            target_repo: env_to_str("NTP_TARGET_REPO"),
            gated_stage: env_to_str("NTP_GATED_STAGE")
                .unwrap_or_else(|| DEFAULT_GATED_STAGE.into()),
            netlify_webhook_secret: env_to_str("NTP_NETLIFY_WEBHOOK_SECRET"),
            bind_ip: env_to_str("NTP_BIND_IP").unwrap_or_else(|| "127.0.0.1:3000".into()),
        }
    }

    pub fn empty() -> Self {
        Self {
            telemetry_url: None,
            travis_api_url: "".into(),
            github_api_url: "".into(),
            travis_access_token: "".into(),
            github_oauth_token: "".into(),
            target_repo: None,
            gated_stage: DEFAULT_GATED_STAGE.into(),
            netlify_webhook_secret: None,
            bind_ip: "".into(),
        }
    }

    pub fn telemetry_url(&self) -> Option<&str> {
        self.telemetry_url.as_deref()
    }

    pub fn travis_api_url(&self) -> &str {
        &self.travis_api_url
    }

    /// Public endpoint exposing the webhook signing key.
    pub fn travis_config_url(&self) -> String {
        format!("{}/config", self.travis_api_url)
    }

    pub fn github_api_url(&self) -> &str {
        &self.github_api_url
    }

    pub fn travis_access_token(&self) -> &str {
        &self.travis_access_token
    }

    pub fn github_oauth_token(&self) -> &str {
        &self.github_oauth_token
    }

    pub fn target_repo(&self) -> Option<&str> {
        self.target_repo.as_deref()
    }

    pub fn gated_stage(&self) -> &str {
        &self.gated_stage
    }

    pub fn netlify_webhook_secret(&self) -> Option<&str> {
        self.netlify_webhook_secret.as_deref()
    }

    pub fn bind_ip(&self) -> &str {
        &self.bind_ip
    }

    pub fn set_telemetry_url<T: Into<String>>(&mut self, value: T) {
        self.telemetry_url = Some(value.into());
    }

    pub fn set_travis_api_url<T: Into<String>>(&mut self, value: T) {
        self.travis_api_url = value.into();
    }

    pub fn set_github_api_url<T: Into<String>>(&mut self, value: T) {
        self.github_api_url = value.into();
    }

    pub fn set_travis_access_token<T: Into<String>>(&mut self, value: T) {
        self.travis_access_token = value.into();
    }

    pub fn set_github_oauth_token<T: Into<String>>(&mut self, value: T) {
        self.github_oauth_token = value.into();
    }

    pub fn set_target_repo<T: Into<String>>(&mut self, value: T) {
        self.target_repo = Some(value.into());
    }

    pub fn set_gated_stage<T: Into<String>>(&mut self, value: T) {
        self.gated_stage = value.into();
    }

    pub fn set_netlify_webhook_secret<T: Into<String>>(&mut self, value: T) {
        self.netlify_webhook_secret = Some(value.into());
    }

    pub fn set_bind_ip<T: Into<String>>(&mut self, value: T) {
        self.bind_ip = value.into();
    }

    /// Checks the settings every command needs to talk to Travis.
    pub fn validate_configuration(&self) -> Result<(), ConfigError> {
        if self.travis_access_token.is_empty() {
            return Err(ConfigError::MissingSetting("NTP_TRAVIS_ACCESS_TOKEN"));
        }

        match &self.target_repo {
            Some(repo) => {
                RepositoryPath::new(repo)
                    .map_err(|_| ConfigError::MalformedTargetRepo(repo.clone()))?;
            }
            None => return Err(ConfigError::MissingSetting("NTP_TARGET_REPO")),
        }

        Ok(())
    }

    /// Same as [`Config::validate_configuration`], plus the GitHub token used
    /// to publish statuses and the bind address.
    pub fn validate_server_configuration(&self) -> Result<(), ConfigError> {
        self.validate_configuration()?;

        if self.github_oauth_token.is_empty() {
            return Err(ConfigError::MissingSetting("NTP_GITHUB_OAUTH_TOKEN"));
        }

        let _ = SocketAddr::from_str(&self.bind_ip)
            .map_err(|_| ConfigError::MalformedBindIp(self.bind_ip.clone()))?;

        Ok(())
    }
}

fn env_to_str(env_key: &str) -> Option<String> {
    std::env::var(env_key).ok().filter(|s| !s.is_empty())
}
