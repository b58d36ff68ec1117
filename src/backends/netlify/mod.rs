mod http;
mod models;

pub use http::*;
pub use models::*;
