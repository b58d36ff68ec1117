pub mod backends;
pub mod cmdargs;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod repository_path;
pub mod server_info;
pub mod service;
