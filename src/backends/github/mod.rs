mod apiclient;
mod error;
mod models;

pub use apiclient::*;
pub use error::GitHubError;
pub use models::*;
