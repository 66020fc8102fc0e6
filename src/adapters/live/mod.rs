//! Live adapters: network-backed clients with the same port shapes as
//! the emulators. These require real credentials and connectivity.

pub mod auth;
pub mod database;
pub mod media;
pub mod redis;
pub mod transport;
pub mod video_host;

pub use redis::RedisPool;
pub use transport::ReqwestTransport;
