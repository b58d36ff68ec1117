use std::any::Any;

use async_trait::async_trait;
use pseudo::Mock;

use super::{FetchError, FetchRequest, FetchResponse, HttpFetch};

type FetchMock = Mock<FetchRequest, Result<FetchResponse, FetchError>>;

/// In-memory [`HttpFetch`] routing each known endpoint to its own mock.
#[derive(Debug)]
pub struct FakeFetcher {
    pub travis_config: FetchMock,
    pub travis_build: FetchMock,
    pub travis_requests: FetchMock,
    pub github_statuses: FetchMock,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self {
            travis_config: Mock::new(Ok(FetchResponse::new(200, "{}"))),
            travis_build: Mock::new(Ok(FetchResponse::new(200, "{\"stages\":[]}"))),
            travis_requests: Mock::new(Ok(FetchResponse::new(202, "{}"))),
            github_statuses: Mock::new(Ok(FetchResponse::new(201, "{}"))),
        }
    }

    pub fn with_travis_config(mut self, value: Result<FetchResponse, FetchError>) -> Self {
        self.travis_config = Mock::new(value);
        self
    }

    pub fn with_travis_build(mut self, value: Result<FetchResponse, FetchError>) -> Self {
        self.travis_build = Mock::new(value);
        self
    }

    pub fn with_travis_requests(mut self, value: Result<FetchResponse, FetchError>) -> Self {
        self.travis_requests = Mock::new(value);
        self
    }

    pub fn with_github_statuses(mut self, value: Result<FetchResponse, FetchError>) -> Self {
        self.github_statuses = Mock::new(value);
        self
    }
}

#[async_trait]
impl HttpFetch for FakeFetcher {
    async fn send(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        if request.url.ends_with("/config") {
            self.travis_config.call(request)
        } else if request.url.contains("/build/") {
            self.travis_build.call(request)
        } else if request.url.ends_with("/requests") {
            self.travis_requests.call(request)
        } else if request.url.contains("/statuses/") {
            self.github_statuses.call(request)
        } else {
            Err(FetchError::RequestFailed(
                request.url,
                "no fake endpoint".into(),
            ))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
