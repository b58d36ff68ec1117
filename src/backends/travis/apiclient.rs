use crate::{
    config::Config,
    fetch::{FetchRequest, HttpFetch},
    repository_path::RepositoryPath,
    server_info::APP_NAME,
};

use super::{error::TravisError, BuildId, BuildInfo, BuildRequest};

const TRAVIS_API_VERSION: &str = "3";

pub struct Client<'a> {
    config: &'a Config,
    fetcher: &'a dyn HttpFetch,
}

impl<'a> Client<'a> {
    pub fn new(config: &'a Config, fetcher: &'a dyn HttpFetch) -> Self {
        Self { config, fetcher }
    }

    fn authorization(&self) -> String {
        format!("token {}", self.config.travis_access_token())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_build_info(&self, build_id: &BuildId) -> Result<BuildInfo, TravisError> {
        let root_url = self.config.travis_api_url();
        let request = FetchRequest::get(format!("{root_url}/build/{build_id}"))
            .header("User-Agent", APP_NAME)
            .header("Travis-API-Version", TRAVIS_API_VERSION)
            .header("Authorization", self.authorization());

        let resp = self
            .fetcher
            .send(request)
            .await
            .map_err(|e| TravisError::CouldNotFetchBuild(build_id.to_string(), e))?;

        if !resp.is_success() {
            return Err(TravisError::BadStatusCode(resp.status));
        }

        let build_info: BuildInfo = resp.json().map_err(TravisError::MalformedResponse)?;

        tracing::info!(
            message = "Fetched build info",
            build_id = %build_id,
            stages = ?build_info.stage_names().collect::<Vec<_>>()
        );

        Ok(build_info)
    }

    #[tracing::instrument(skip(self, data))]
    pub async fn trigger_build(
        &self,
        repository: &RepositoryPath,
        data: &BuildRequest,
    ) -> Result<(), TravisError> {
        let root_url = self.config.travis_api_url();
        let slug = repository.url_encoded();
        let body = serde_json::to_value(data).map_err(TravisError::MalformedRequest)?;
        let request = FetchRequest::post(format!("{root_url}/repo/{slug}/requests"))
            .header("Travis-API-Version", TRAVIS_API_VERSION)
            .header("Authorization", self.authorization())
            .json(body);

        let resp = self
            .fetcher
            .send(request)
            .await
            .map_err(TravisError::CouldNotTriggerBuild)?;

        if !resp.is_success() {
            return Err(TravisError::BadStatusCode(resp.status));
        }

        tracing::info!(
            message = "Build requested",
            repository = %repository,
            branch = %data.request.branch,
        );

        Ok(())
    }
}
