use std::sync::Arc;

use crate::fetch::{FetchError, HttpFetch, ReqwestFetcher};

#[derive(Debug, Clone)]
pub struct ServiceHandler {
    fetcher: Arc<dyn HttpFetch>,
}

impl ServiceHandler {
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self { fetcher }
    }

    pub fn new_defaults() -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Arc::new(ReqwestFetcher::new()?),
        })
    }

    pub fn fetcher(&self) -> &dyn HttpFetch {
        self.fetcher.as_ref()
    }
}
