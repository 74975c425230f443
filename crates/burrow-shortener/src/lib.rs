//! Short code allocation.
//!
//! [`ShortenerService`] validates the long URL, then either reserves a
//! caller-chosen alias with a single conditional insert or draws generated
//! codes until one lands.

pub mod config;
pub mod service;
pub mod validation;

pub use config::ShortenerConfig;
pub use service::ShortenerService;
