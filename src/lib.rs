//! Offstage - Offline Service Emulation Library
//!
//! Hexagonal Architecture:
//! - domain/: Pure value types (hosted videos, auth identity, rate-limit decisions)
//! - ports/: Trait definitions, one per external dependency
//! - adapters/: Concrete implementations (emulated and live)
//! - application/: Service resolution (the single real-vs-emulated branch)
//! - config: Environment configuration
//!
//! Setting `USE_LOCAL_DEV=true` swaps every external dependency (auth,
//! database driver, cache, rate limiter, content host, media SDK) for a
//! file-backed local emulator so the platform runs fully offline.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports for convenience
pub use adapters::emulated::{
    interceptor, EmulatedCache, EmulatedVideoHost, SnapshotStore,
};
pub use application::Services;
pub use config::EmulationConfig;
