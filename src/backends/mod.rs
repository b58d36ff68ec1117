pub mod github;
pub mod netlify;
pub mod travis;
