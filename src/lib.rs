//! tallyflow: on-demand aggregation over an upstream data API
//!
//! Two engines share one fetcher:
//! - `window_core`: per-category deduplicating number windows with averages
//! - `rank_core`: TTL-cached top-N rankings of users and posts

pub mod config;
pub mod error;
pub mod rank_core;
pub mod server;
pub mod source;
pub mod window_core;

pub use config::AggregatorConfig;
pub use error::{AggregatorError, AggregatorResult, ConfigError, FetchError};
