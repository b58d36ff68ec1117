use std::{any::Any, time::Duration};

use async_trait::async_trait;

use crate::server_info::{APP_NAME, APP_VERSION};

use super::{FetchError, FetchMethod, FetchRequest, FetchResponse};

#[async_trait]
pub trait HttpFetch: std::fmt::Debug + Send + Sync {
    async fn send(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;

    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("{APP_NAME}/{APP_VERSION}"))
            .build()
            .map_err(|e| FetchError::ClientSetup(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut builder = match request.method {
            FetchMethod::Get => self.client.get(&request.url),
            FetchMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(request.url.clone(), e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::UnreadableBody(request.url.clone(), e.to_string()))?;

        tracing::debug!(status = status, body_len = body.len());

        Ok(FetchResponse { status, body })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
