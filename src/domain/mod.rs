pub mod auth;
pub mod media;
pub mod rate_limit;
pub mod video;
