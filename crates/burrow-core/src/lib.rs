//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the shared model used by the shortener (code
//! allocation), the redirector (read path) and the storage backends.

pub mod base62;
pub mod error;
pub mod record;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{CacheError, CoreError, ErrorKind, ShortenerError, StorageError};
pub use record::{Origin, ShortCodeRecord};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use shortener::{ShortenOutcome, ShortenParams, Shortener};
