mod apiclient;
mod error;
mod http;
mod models;
mod signature;
mod status;

#[cfg(test)]
mod tests;

pub use apiclient::*;
pub use error::TravisError;
pub use http::*;
pub use models::*;
pub use signature::*;
pub use status::*;
