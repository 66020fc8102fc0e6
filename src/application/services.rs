//! Substitution controller.
//!
//! The one place that branches on the emulation switch: every dependency
//! name is bound here, once at startup, to either its live client or its
//! offline emulator. Both variants expose identical port shapes, so
//! nothing downstream knows which is active.

use crate::adapters::emulated::auth::DevAuth;
use crate::adapters::emulated::database::LocalPostgres;
use crate::adapters::emulated::interceptor;
use crate::adapters::emulated::media::EmulatedMediaSdk;
use crate::adapters::emulated::rate_limit::AlwaysAllowLimiter;
use crate::adapters::emulated::{EmulatedCache, EmulatedVideoHost, SnapshotStore};
use crate::adapters::live::auth::LiveAuth;
use crate::adapters::live::database::ServerlessPostgres;
use crate::adapters::live::media::LiveMediaSdk;
use crate::adapters::live::redis::{RedisPool, RedisRateLimiter};
use crate::adapters::live::video_host::LiveVideoHost;
use crate::adapters::live::ReqwestTransport;
use crate::config::EmulationConfig;
use crate::ports::auth::AuthPort;
use crate::ports::cache::CachePort;
use crate::ports::database::SqlDriver;
use crate::ports::media::MediaSdkPort;
use crate::ports::rate_limit::RateLimiterPort;
use crate::ports::transport::HttpTransport;
use crate::ports::video_host::VideoHostPort;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// Resolved dependency set handed to the rest of the application.
pub struct Services {
    pub auth: Arc<dyn AuthPort>,
    pub database: Arc<dyn SqlDriver>,
    pub cache: Arc<dyn CachePort>,
    pub limiter: Arc<dyn RateLimiterPort>,
    pub video_host: Arc<dyn VideoHostPort>,
    pub media: Arc<dyn MediaSdkPort>,
    /// Outbound transport; the interception gateway when emulation is on.
    pub transport: Arc<dyn HttpTransport>,
    /// Set only in emulation mode, for wiring the inbound HTTP surface.
    pub emulated_host: Option<Arc<EmulatedVideoHost>>,
}

impl Services {
    /// Bind every dependency according to the emulation switch. Called
    /// once at startup; the decision is immutable afterwards.
    pub fn resolve(config: &EmulationConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        if config.use_local_dev {
            Ok(Self::emulated(config))
        } else {
            Self::live(config)
        }
    }

    fn emulated(config: &EmulationConfig) -> Self {
        println!("[Services] local dev mode: ENABLED (offline emulators active)");

        let cache_store = SnapshotStore::open_global(config.cache_snapshot_path());
        let video_store = SnapshotStore::open_global(config.video_snapshot_path());
        let host = Arc::new(EmulatedVideoHost::new(video_store));

        // Any raw call that bypasses the resolved ports still ends up at
        // the emulator.
        let passthrough: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new());
        let transport =
            interceptor::install(passthrough, host.clone(), &config.video_api_host);

        Self {
            auth: Arc::new(DevAuth::new()),
            database: Arc::new(LocalPostgres::new(&config.database_url)),
            cache: Arc::new(EmulatedCache::new(cache_store)),
            limiter: Arc::new(AlwaysAllowLimiter::default()),
            video_host: host.clone(),
            media: Arc::new(EmulatedMediaSdk::new()),
            transport,
            emulated_host: Some(host),
        }
    }

    fn live(config: &EmulationConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        println!("[Services] local dev mode: DISABLED (live clients active)");

        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new());
        let redis = RedisPool::new(&config.redis_url)?;

        Ok(Self {
            auth: Arc::new(LiveAuth::new(
                transport.clone(),
                &config.auth_api_url,
                &config.auth_secret_key,
            )),
            database: Arc::new(ServerlessPostgres::new(
                transport.clone(),
                &config.database_http_url,
            )),
            cache: Arc::new(redis.clone()),
            limiter: Arc::new(RedisRateLimiter::new(
                redis,
                1000,
                Duration::from_secs(60),
            )),
            video_host: Arc::new(LiveVideoHost::new(
                transport.clone(),
                &config.video_api_host,
                &config.video_api_key,
            )),
            media: Arc::new(LiveMediaSdk::new(
                transport.clone(),
                &config.media_api_url,
                &config.media_api_key,
            )),
            transport,
            emulated_host: None,
        })
    }
}
