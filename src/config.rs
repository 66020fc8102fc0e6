//! Configuration for the emulation layer and its live counterparts.

use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once at startup.
///
/// `use_local_dev` is the single switch that decides between live clients
/// and their offline emulators; its value is immutable for the process
/// lifetime.
#[derive(Clone, Debug)]
pub struct EmulationConfig {
    /// Emulation switch (`USE_LOCAL_DEV=true` enables the offline layer)
    pub use_local_dev: bool,
    /// HTTP bind address for the local content-host API
    pub addr: String,
    /// HTTP bind port for the local content-host API
    pub port: String,
    /// Directory holding the JSON snapshot files
    pub snapshot_dir: PathBuf,
    /// Redis connection URL (live cache)
    pub redis_url: String,
    /// Local PostgreSQL connection string (emulated database driver)
    pub database_url: String,
    /// Serverless SQL-over-HTTP endpoint (live database driver)
    pub database_http_url: String,
    /// Hostname of the content-host API the interceptor answers for
    pub video_api_host: String,
    /// Content-host API key (live client)
    pub video_api_key: String,
    /// Auth provider API base URL (live client)
    pub auth_api_url: String,
    /// Auth provider secret key (live client)
    pub auth_secret_key: String,
    /// Media SDK API base URL (live client)
    pub media_api_url: String,
    /// Media SDK API key (live client)
    pub media_api_key: String,
}

impl EmulationConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            use_local_dev: env::var("USE_LOCAL_DEV")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            addr: env::var("ADDR").unwrap_or_else(|_| String::from("127.0.0.1")),
            port: env::var("PORT").unwrap_or_else(|_| String::from("3080")),
            snapshot_dir: env::var("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./.offstage")),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| String::from("redis://127.0.0.1/")),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| {
                String::from("host=127.0.0.1 user=postgres dbname=platform")
            }),
            database_http_url: env::var("DATABASE_HTTP_URL")
                .unwrap_or_else(|_| String::from("https://sql.example.com/v1/query")),
            video_api_host: env::var("VIDEO_API_HOST")
                .unwrap_or_else(|_| String::from("video.bunnycdn.com")),
            video_api_key: env::var("VIDEO_API_KEY").unwrap_or_default(),
            auth_api_url: env::var("AUTH_API_URL")
                .unwrap_or_else(|_| String::from("https://api.clerk.com")),
            auth_secret_key: env::var("AUTH_SECRET_KEY").unwrap_or_default(),
            media_api_url: env::var("MEDIA_API_URL")
                .unwrap_or_else(|_| String::from("https://api.mux.com")),
            media_api_key: env::var("MEDIA_API_KEY").unwrap_or_default(),
        }
    }

    /// Snapshot file backing the cache emulator.
    pub fn cache_snapshot_path(&self) -> PathBuf {
        self.snapshot_dir.join("cache.json")
    }

    /// Snapshot file backing the content-host emulator.
    pub fn video_snapshot_path(&self) -> PathBuf {
        self.snapshot_dir.join("videos.json")
    }
}
