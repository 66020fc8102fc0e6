//! Adapters - Concrete implementations of ports.

pub mod emulated;
pub mod live;
