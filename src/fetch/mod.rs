mod error;
mod request;
mod service;

#[cfg(test)]
pub(crate) mod fake;

pub use self::error::FetchError;
pub use self::request::{FetchMethod, FetchRequest, FetchResponse};
pub use self::service::{HttpFetch, ReqwestFetcher};
