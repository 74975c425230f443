//! Cache trait and implementations for the redirect read path.

pub mod cache;
pub mod layered;
pub mod moka;
pub mod negative;
pub mod redis;

pub use burrow_core::CacheError;
pub use cache::{Result, UrlCache};
pub use layered::LayeredCache;
pub use moka::{CacheConfig, MokaUrlCache};
pub use negative::NegativeCache;
pub use redis::RedisUrlCache;
