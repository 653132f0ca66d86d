//! REST client for the studio API, implementing the preset store, generation
//! backend and account service contracts from `atelier-core`.

pub mod client;
pub mod config;
pub mod error;

pub use client::HttpStudioClient;
pub use config::ClientConfig;
pub use error::ClientError;
