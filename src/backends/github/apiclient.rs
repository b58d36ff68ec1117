use crate::{
    config::Config,
    fetch::{FetchRequest, HttpFetch},
    repository_path::RepositoryPath,
    server_info::APP_NAME,
};

use super::{error::GitHubError, CommitStatus};

pub struct Client<'a> {
    config: &'a Config,
    fetcher: &'a dyn HttpFetch,
}

impl<'a> Client<'a> {
    pub fn new(config: &'a Config, fetcher: &'a dyn HttpFetch) -> Self {
        Self { config, fetcher }
    }

    #[tracing::instrument(skip(self, status))]
    pub async fn create_status(
        &self,
        repository: &RepositoryPath,
        commit: &str,
        status: &CommitStatus,
    ) -> Result<(), GitHubError> {
        let root_url = self.config.github_api_url();
        let url = format!(
            "{root_url}/repos/{}/{}/statuses/{commit}",
            repository.owner(),
            repository.name()
        );
        let body = serde_json::to_value(status).map_err(GitHubError::MalformedRequest)?;
        let request = FetchRequest::post(&url)
            .header("User-Agent", APP_NAME)
            .header(
                "Authorization",
                format!("token {}", self.config.github_oauth_token()),
            )
            .json(body);

        let resp = self
            .fetcher
            .send(request)
            .await
            .map_err(GitHubError::CouldNotCreateStatus)?;

        if !resp.is_success() {
            tracing::error!(
                message = "Failed to POST commit status",
                url = %url,
                status = resp.status,
                body = %resp.body
            );
            return Err(GitHubError::BadStatusCode(resp.status));
        }

        tracing::info!(
            message = "Commit status created",
            repository = %repository,
            commit = commit,
            state = %status.state
        );

        Ok(())
    }
}
