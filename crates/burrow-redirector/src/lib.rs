//! Redirect resolution: short code in, long URL out.
//!
//! [`RedirectorService`] reads through any [`ReadRepository`]. Caching is
//! added by wrapping the store in a [`CachedRepository`], which also serves
//! as the write path so fresh records are visible to the read path at once.
//!
//! [`ReadRepository`]: burrow_core::ReadRepository

pub mod error;
pub mod redirector;
pub mod repository;
pub mod service;

pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use repository::CachedRepository;
pub use service::RedirectorService;
